use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::container::types::{ChannelSet, Header};

pub trait ImageReader {
    fn read_image(&self, path: &Path) -> Result<(Header, ChannelSet)>;
}
