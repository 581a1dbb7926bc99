//! Alpha significance analysis.
//!
//! An alpha channel that is fully opaque, fully transparent or an exact 0/1
//! mask adds nothing a compositor needs, so it can be dropped from the file.

use tracing::debug;

use crate::image_pipeline::container::types::{ChannelSet, SampleBuffer};

pub const ALPHA_CHANNEL: &str = "A";

/// What the alpha step found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaCheck {
    /// No `A` channel present
    Missing,
    /// Alpha kept
    Meaningful,
    /// Alpha dropped
    Removed,
}

/// Returns whether an alpha buffer carries information.
///
/// More than two distinct values is meaningful. Exactly two distinct values is
/// meaningful only if the smaller one is not 0 and the larger one is not 1.
/// A single value (or an empty buffer) never is.
pub fn is_alpha_meaningful(samples: &SampleBuffer) -> bool {
    let mut distinct: [Option<f64>; 2] = [None, None];

    for value in samples.values_f64() {
        match distinct {
            [None, _] => distinct[0] = Some(value),
            [Some(first), None] => {
                if !same_value(first, value) {
                    distinct[1] = Some(value);
                }
            }
            [Some(first), Some(second)] => {
                if !same_value(first, value) && !same_value(second, value) {
                    return true;
                }
            }
        }
    }

    match distinct {
        [Some(first), Some(second)] => {
            let (smallest, largest) = if first.total_cmp(&second).is_le() {
                (first, second)
            } else {
                (second, first)
            };
            smallest != 0.0 && largest != 1.0
        }
        _ => false,
    }
}

// NaNs compare equal to each other so a buffer of NaNs counts as one value.
fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Drops the `A` channel when it carries no information.
pub fn drop_meaningless_alpha(mut channels: ChannelSet) -> (ChannelSet, AlphaCheck) {
    if !channels.contains(ALPHA_CHANNEL) {
        return (channels, AlphaCheck::Missing);
    }

    let meaningful = channels
        .get(ALPHA_CHANNEL)
        .is_some_and(|alpha| is_alpha_meaningful(&alpha.samples));

    if meaningful {
        debug!("Alpha channel has varying values, keeping it");
        (channels, AlphaCheck::Meaningful)
    } else {
        channels.remove(ALPHA_CHANNEL);
        (channels, AlphaCheck::Removed)
    }
}
