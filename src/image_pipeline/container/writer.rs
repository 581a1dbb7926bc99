use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::container::types::{ChannelSet, Header};

pub trait ImageWriter {
    fn write_image(&self, header: Header, channels: ChannelSet, path: &Path) -> Result<()>;
}
