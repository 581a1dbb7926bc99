use std::io::Cursor;
use std::path::Path;

use exr::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::container::types::{ChannelSet, Codec, Header, SampleBuffer};
use crate::image_pipeline::container::writer::ImageWriter;

pub struct ExrFileWriter;

impl ImageWriter for ExrFileWriter {
    fn write_image(&self, header: Header, channels: ChannelSet, path: &Path) -> Result<()> {
        debug!(
            "Encoding EXR image: {}x{} with {}",
            header.size.0, header.size.1, header.compression
        );

        validate_sample_counts(&header, &channels)?;

        let list: Vec<AnyChannel<FlatSamples>> = channels
            .into_iter()
            .map(|channel| AnyChannel {
                name: Text::from(channel.name.as_str()),
                sample_data: match channel.samples {
                    SampleBuffer::F16(values) => FlatSamples::F16(values),
                    SampleBuffer::F32(values) => FlatSamples::F32(values),
                    SampleBuffer::U32(values) => FlatSamples::U32(values),
                },
                quantize_linearly: channel.quantize_linearly,
                sampling: Vec2(channel.sampling.0, channel.sampling.1),
            })
            .collect();

        let encoding = Encoding {
            compression: codec_to_exr(header.compression),
            blocks: header.blocks,
            line_order: header.line_order,
        };

        let layer = Layer::new(
            header.size,
            header.layer_attributes,
            encoding,
            AnyChannels::sort(list.into()),
        );
        let image = Image::new(header.image_attributes, layer);

        // Encode fully before touching the target so a failed encode keeps the original.
        let mut buffer = Vec::new();
        image
            .write()
            .to_buffered(Cursor::new(&mut buffer))
            .map_err(|e| ProcessingError::EncodeError(format!("{}: {}", path.display(), e)))?;

        std::fs::write(path, &buffer).map_err(|e| {
            ProcessingError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;

        debug!("EXR encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

fn validate_sample_counts(header: &Header, channels: &ChannelSet) -> Result<()> {
    let (width, height) = header.size;
    for channel in channels.iter() {
        let (sx, sy) = channel.sampling;
        let expected = (width / sx.max(1)) * (height / sy.max(1));
        if channel.samples.len() != expected {
            return Err(ProcessingError::ChannelSizeMismatch {
                name: channel.name.clone(),
                expected,
                actual: channel.samples.len(),
            });
        }
    }
    Ok(())
}

fn codec_to_exr(codec: Codec) -> Compression {
    match codec {
        Codec::None => Compression::Uncompressed,
        Codec::Rle => Compression::RLE,
        Codec::Zips => Compression::ZIP1,
        Codec::Zip => Compression::ZIP16,
        Codec::Piz => Compression::PIZ,
        Codec::Pxr24 => Compression::PXR24,
        Codec::B44 => Compression::B44,
        Codec::B44a => Compression::B44A,
        Codec::Dwaa => Compression::DWAA(None),
        Codec::Dwab => Compression::DWAB(None),
    }
}
