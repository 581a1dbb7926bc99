//! Per-file transforms
//!
//! Each transform takes the state it works on by value and hands back the new
//! state together with what changed, so no two stages share a buffer.

pub mod alpha;
pub mod compression;
pub mod precision;

pub use alpha::{ALPHA_CHANNEL, AlphaCheck, drop_meaningless_alpha, is_alpha_meaningful};
pub use compression::{apply_compression, select_compression};
pub use precision::{COLOR_CHANNELS, downcast_color_channels, is_color_channel};
