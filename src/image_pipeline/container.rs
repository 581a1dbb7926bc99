//! EXR container module
//!
//! This module provides the header/channel view of EXR files that the pipeline
//! works on, plus reader and writer implementations backed by the exr crate.

mod reader;
mod writer;
mod exr_reader;
mod exr_writer;
pub mod types;

pub use reader::ImageReader;
pub use writer::ImageWriter;
pub use exr_reader::ExrFileReader;
pub use exr_writer::ExrFileWriter;
pub use types::{CODEC_NAMES, Channel, ChannelSet, Codec, Header, ImageAsset, SampleBuffer};
