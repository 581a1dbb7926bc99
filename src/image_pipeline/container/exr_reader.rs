//! EXR reader implementation using the exr library.
//!
//! Loads every channel of a single-part file at full resolution, keeping the
//! header attributes so the file can be written back without losing metadata.

use std::path::Path;

use exr::meta::attribute::LevelMode;
use exr::meta::{BlockDescription, MetaData};
use exr::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::container::reader::ImageReader;
use crate::image_pipeline::container::types::{Channel, ChannelSet, Codec, Header, SampleBuffer};

/// Reads EXR files from disk.
pub struct ExrFileReader;

impl ImageReader for ExrFileReader {
    fn read_image(&self, path: &Path) -> Result<(Header, ChannelSet)> {
        debug!("Decoding EXR image {}", path.display());

        // Only the largest level is decoded, so a rewrite would drop mip and rip levels.
        let meta = MetaData::read_from_file(path, false).map_err(|e| decode_error(path, e))?;
        if meta.headers.iter().any(|header| {
            matches!(&header.blocks, BlockDescription::Tiles(tiles) if tiles.level_mode != LevelMode::Singular)
        }) {
            return Err(ProcessingError::UnsupportedFormat(format!(
                "{}: multi-resolution (mip/rip mapped) files are not supported",
                path.display()
            )));
        }

        let image = read()
            .no_deep_data()
            .largest_resolution_level()
            .all_channels()
            .all_layers()
            .all_attributes()
            .from_file(path)
            .map_err(|e| decode_error(path, e))?;

        let image_attributes = image.attributes;
        let mut layers = image.layer_data;

        // Multi-part files would lose parts on rewrite, so they are left alone.
        if layers.len() != 1 {
            return Err(ProcessingError::UnsupportedFormat(format!(
                "{}: expected a single-part file, found {} parts",
                path.display(),
                layers.len()
            )));
        }
        let layer = layers.remove(0);

        let header = Header {
            compression: codec_from_exr(layer.encoding.compression)?,
            size: (layer.size.0, layer.size.1),
            blocks: layer.encoding.blocks,
            line_order: layer.encoding.line_order,
            layer_attributes: layer.attributes,
            image_attributes,
        };

        let channels: ChannelSet = layer
            .channel_data
            .list
            .into_iter()
            .map(|channel| Channel {
                name: channel.name.to_string(),
                samples: match channel.sample_data {
                    FlatSamples::F16(values) => SampleBuffer::F16(values),
                    FlatSamples::F32(values) => SampleBuffer::F32(values),
                    FlatSamples::U32(values) => SampleBuffer::U32(values),
                },
                quantize_linearly: channel.quantize_linearly,
                sampling: (channel.sampling.0, channel.sampling.1),
            })
            .collect();

        debug!(
            "Decoded image: {}x{}, compression {}, channels [{}]",
            header.size.0,
            header.size.1,
            header.compression,
            channels.names().collect::<Vec<_>>().join(", ")
        );

        Ok((header, channels))
    }
}

fn decode_error(path: &Path, error: exr::error::Error) -> ProcessingError {
    match error {
        exr::error::Error::Io(e) => {
            ProcessingError::InputReadError(format!("{}: {}", path.display(), e))
        }
        exr::error::Error::NotSupported(what) => {
            ProcessingError::UnsupportedFormat(format!("{}: {}", path.display(), what))
        }
        other => ProcessingError::DecodeError(format!("{}: {}", path.display(), other)),
    }
}

fn codec_from_exr(compression: Compression) -> Result<Codec> {
    #[allow(unreachable_patterns)]
    match compression {
        Compression::Uncompressed => Ok(Codec::None),
        Compression::RLE => Ok(Codec::Rle),
        Compression::ZIP1 => Ok(Codec::Zips),
        Compression::ZIP16 => Ok(Codec::Zip),
        Compression::PIZ => Ok(Codec::Piz),
        Compression::PXR24 => Ok(Codec::Pxr24),
        Compression::B44 => Ok(Codec::B44),
        Compression::B44A => Ok(Codec::B44a),
        Compression::DWAA(_) => Ok(Codec::Dwaa),
        Compression::DWAB(_) => Ok(Codec::Dwab),
        other => Err(ProcessingError::UnsupportedFormat(format!(
            "compression {:?}",
            other
        ))),
    }
}
