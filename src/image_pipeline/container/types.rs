//! EXR container data types

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use exr::image::Blocks;
use exr::meta::attribute::{IntegerBounds, LineOrder};
use exr::meta::header::{ImageAttributes, LayerAttributes};
use half::f16;

use crate::image_pipeline::common::error::ProcessingError;

/// Compression codecs a file header can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    None,
    Rle,
    Zips,
    Zip,
    Piz,
    Pxr24,
    B44,
    B44a,
    Dwaa,
    Dwab,
}

/// Name lookup table for `--compression-type`.
pub const CODEC_NAMES: [(&str, Codec); 10] = [
    ("NONE", Codec::None),
    ("RLE", Codec::Rle),
    ("ZIPS", Codec::Zips),
    ("ZIP", Codec::Zip),
    ("PIZ", Codec::Piz),
    ("PXR24", Codec::Pxr24),
    ("B44", Codec::B44),
    ("B44A", Codec::B44a),
    ("DWAA", Codec::Dwaa),
    ("DWAB", Codec::Dwab),
];

impl Codec {
    pub fn name(self) -> &'static str {
        CODEC_NAMES
            .iter()
            .find(|(_, codec)| *codec == self)
            .map(|(name, _)| *name)
            .unwrap_or("UNKNOWN")
    }
}

/// Looks `name` up in [`CODEC_NAMES`]; the same lookup `select_compression` uses.
impl FromStr for Codec {
    type Err = ProcessingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        CODEC_NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, codec)| *codec)
            .ok_or_else(|| ProcessingError::UnknownCompressionKind(name.to_string()))
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header of a single-part EXR file.
///
/// Only `compression` is touched by the pipeline. The remaining fields are
/// carried through so a rewrite keeps the original metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub compression: Codec,
    /// Data window size in pixels (width, height)
    pub size: (usize, usize),
    pub blocks: Blocks,
    pub line_order: LineOrder,
    pub layer_attributes: LayerAttributes,
    pub image_attributes: ImageAttributes,
}

impl Header {
    /// Scan-line header with default attributes and a display window matching `size`.
    pub fn new(size: (usize, usize), compression: Codec) -> Self {
        Self {
            compression,
            size,
            blocks: Blocks::ScanLines,
            line_order: LineOrder::Increasing,
            layer_attributes: LayerAttributes::default(),
            image_attributes: ImageAttributes::new(IntegerBounds::from_dimensions(size)),
        }
    }
}

/// Flat pixel buffer of one channel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBuffer {
    F16(Vec<f16>),
    F32(Vec<f32>),
    U32(Vec<u32>),
}

impl SampleBuffer {
    pub fn len(&self) -> usize {
        match self {
            SampleBuffer::F16(values) => values.len(),
            SampleBuffer::F32(values) => values.len(),
            SampleBuffer::U32(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples widened to `f64`, which represents every f16, f32 and u32 exactly.
    pub fn values_f64(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            SampleBuffer::F16(values) => Box::new(values.iter().map(|v| f64::from(v.to_f32()))),
            SampleBuffer::F32(values) => Box::new(values.iter().map(|&v| f64::from(v))),
            SampleBuffer::U32(values) => Box::new(values.iter().map(|&v| f64::from(v))),
        }
    }
}

/// A named channel and its samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    pub samples: SampleBuffer,
    /// Hint for lossy codecs, preserved on rewrite
    pub quantize_linearly: bool,
    /// Subsampling factor (x, y); (1, 1) for full resolution
    pub sampling: (usize, usize),
}

impl Channel {
    pub fn new(name: impl Into<String>, samples: SampleBuffer) -> Self {
        Self {
            name: name.into(),
            samples,
            quantize_linearly: false,
            sampling: (1, 1),
        }
    }
}

/// Channels of one image keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSet {
    channels: BTreeMap<String, Channel>,
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a channel, replacing any existing channel with the same name.
    pub fn insert(&mut self, channel: Channel) -> Option<Channel> {
        self.channels.insert(channel.name.clone(), channel)
    }

    pub fn remove(&mut self, name: &str) -> Option<Channel> {
        self.channels.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }
}

impl FromIterator<Channel> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = Channel>>(iter: I) -> Self {
        let mut set = ChannelSet::new();
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}

impl IntoIterator for ChannelSet {
    type Item = Channel;
    type IntoIter = std::collections::btree_map::IntoValues<String, Channel>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.into_values()
    }
}

/// One loaded file, owned by the processor until the write decision.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub header: Header,
    pub channels: ChannelSet,
}
