//! Half-float downcasting of color channels.

use half::f16;

use crate::image_pipeline::container::types::{Channel, ChannelSet, SampleBuffer};

/// Channels that may lose precision. Everything else (depth, normals, ids) is kept as is.
pub const COLOR_CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

pub fn is_color_channel(name: &str) -> bool {
    COLOR_CHANNELS.contains(&name)
}

/// Converts 32-bit float color channels to half floats (round to nearest even).
///
/// Returns the new channel set and the names of the channels that were converted.
pub fn downcast_color_channels(channels: ChannelSet) -> (ChannelSet, Vec<String>) {
    let mut converted = Vec::new();

    let channels: ChannelSet = channels
        .into_iter()
        .map(|channel| {
            if !is_color_channel(&channel.name) {
                return channel;
            }
            match channel.samples {
                SampleBuffer::F32(values) => {
                    converted.push(channel.name.clone());
                    Channel {
                        samples: SampleBuffer::F16(values.into_iter().map(f16::from_f32).collect()),
                        ..channel
                    }
                }
                samples => Channel { samples, ..channel },
            }
        })
        .collect();

    (channels, converted)
}
