use std::path::Path;

use tracing::{debug, info, instrument};

use crate::image_pipeline::{
    common::error::Result,
    container::{ExrFileReader, ExrFileWriter, ImageAsset, ImageReader, ImageWriter},
    processing::types::{ChangeSet, FileOutcome, ProcessingConfig},
    transforms::{AlphaCheck, apply_compression, downcast_color_channels, drop_meaningless_alpha},
};

/// Runs the alpha, compression and precision steps over one file and writes
/// it back in place when any of them changed something.
pub struct FileProcessor<R: ImageReader, W: ImageWriter> {
    reader: R,
    writer: W,
    config: ProcessingConfig,
}

impl FileProcessor<ExrFileReader, ExrFileWriter> {
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            reader: ExrFileReader,
            writer: ExrFileWriter,
            config,
        }
    }
}

impl<R: ImageReader, W: ImageWriter> FileProcessor<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ProcessingConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let name = display_name(path);

        if self.config.blacklist.matches(path) {
            info!("Skipping {} for compression (reason: blacklist)", name);
            return Ok(FileOutcome::SkippedBlacklisted);
        }

        info!("Processing file {}", path.display());

        let asset = {
            let _span = tracing::info_span!("load").entered();
            let (header, channels) = self.reader.read_image(path)?;
            ImageAsset {
                path: path.to_path_buf(),
                header,
                channels,
            }
        };

        let (asset, changes) = self.transform(asset);

        if !changes.is_dirty() {
            info!("Skipping {} (reason: already compressed)", name);
            return Ok(FileOutcome::SkippedUnmodified);
        }

        if self.config.dry_run {
            info!("Would write {} (dry run)", asset.path.display());
            return Ok(FileOutcome::WouldWrite(changes));
        }

        {
            let _span = tracing::info_span!("write").entered();
            info!("Writing to {}", asset.path.display());
            self.writer
                .write_image(asset.header, asset.channels, &asset.path)?;
        }

        Ok(FileOutcome::Written(changes))
    }

    /// Applies the enabled steps in order: alpha check, compression, downcast.
    pub fn transform(&self, asset: ImageAsset) -> (ImageAsset, ChangeSet) {
        let ImageAsset {
            path,
            mut header,
            mut channels,
        } = asset;
        let name = display_name(&path);
        let mut changes = ChangeSet::default();

        if self.config.drop_meaningless_alpha {
            let _span = tracing::debug_span!("alpha_check").entered();
            let (checked, outcome) = drop_meaningless_alpha(channels);
            channels = checked;
            match outcome {
                AlphaCheck::Removed => {
                    info!("Removing meaningless alpha from {}", name);
                    changes.alpha_removed = true;
                }
                AlphaCheck::Meaningful => {
                    info!("Alpha channel may contain meaningful data, skipping")
                }
                AlphaCheck::Missing => info!("No alpha channel found in {}", name),
            }
        }

        if let Some(target) = self.config.target_compression {
            let _span = tracing::debug_span!("compression_check").entered();
            let previous = header.compression;
            let (updated, changed) = apply_compression(header, target);
            header = updated;
            if changed {
                info!("Compressing file {} with {}", name, target);
                changes.compression = Some((previous, target));
            } else {
                debug!("{} already uses {}", name, target);
            }
        }

        if self.config.downcast_color_to_half {
            let _span = tracing::debug_span!("precision_check").entered();
            let (downcast, converted) = downcast_color_channels(channels);
            channels = downcast;
            for channel in &converted {
                info!("Converting {} channel to 16 bit", channel);
            }
            changes.downcast_channels = converted;
        }

        (
            ImageAsset {
                path,
                header,
                channels,
            },
            changes,
        )
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
