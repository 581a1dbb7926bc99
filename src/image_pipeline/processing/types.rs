//! Processing configuration and result types

use std::path::PathBuf;

use crate::image_pipeline::common::error::ProcessingError;
use crate::image_pipeline::container::types::Codec;
use crate::image_pipeline::scan::Blacklist;

/// Configuration for one batch run
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Remove alpha channels that carry no information
    pub drop_meaningless_alpha: bool,
    /// Codec to store files with; `None` keeps each file's codec
    pub target_compression: Option<Codec>,
    /// Convert 32-bit float R/G/B/A channels to half floats
    pub downcast_color_to_half: bool,
    /// Analyze and report, but never write
    pub dry_run: bool,
    /// Process files on the rayon thread pool
    pub parallel: bool,
    /// Paths containing any of these substrings are skipped
    pub blacklist: Blacklist,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            drop_meaningless_alpha: true,
            target_compression: None,
            downcast_color_to_half: true,
            dry_run: false,
            parallel: false,
            blacklist: Blacklist::default(),
        }
    }
}

impl ProcessingConfig {
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder::default()
    }
}

/// Builder for ProcessingConfig
#[derive(Default)]
pub struct ProcessingConfigBuilder {
    drop_meaningless_alpha: Option<bool>,
    target_compression: Option<Option<Codec>>,
    downcast_color_to_half: Option<bool>,
    dry_run: Option<bool>,
    parallel: Option<bool>,
    blacklist: Option<Blacklist>,
}

impl ProcessingConfigBuilder {
    pub fn drop_meaningless_alpha(mut self, enable: bool) -> Self {
        self.drop_meaningless_alpha = Some(enable);
        self
    }

    pub fn target_compression(mut self, codec: Option<Codec>) -> Self {
        self.target_compression = Some(codec);
        self
    }

    pub fn downcast_color_to_half(mut self, enable: bool) -> Self {
        self.downcast_color_to_half = Some(enable);
        self
    }

    pub fn dry_run(mut self, enable: bool) -> Self {
        self.dry_run = Some(enable);
        self
    }

    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = Some(enable);
        self
    }

    pub fn blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = Some(blacklist);
        self
    }

    pub fn build(self) -> ProcessingConfig {
        let default = ProcessingConfig::default();
        ProcessingConfig {
            drop_meaningless_alpha: self
                .drop_meaningless_alpha
                .unwrap_or(default.drop_meaningless_alpha),
            target_compression: self.target_compression.unwrap_or(default.target_compression),
            downcast_color_to_half: self
                .downcast_color_to_half
                .unwrap_or(default.downcast_color_to_half),
            dry_run: self.dry_run.unwrap_or(default.dry_run),
            parallel: self.parallel.unwrap_or(default.parallel),
            blacklist: self.blacklist.unwrap_or(default.blacklist),
        }
    }
}

/// What the transforms changed in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub alpha_removed: bool,
    /// (previous, new) codec
    pub compression: Option<(Codec, Codec)>,
    /// Channels converted to half float
    pub downcast_channels: Vec<String>,
}

impl ChangeSet {
    /// The dirty flag: true once any transform changed the header or channels.
    pub fn is_dirty(&self) -> bool {
        self.alpha_removed || self.compression.is_some() || !self.downcast_channels.is_empty()
    }
}

/// Terminal state of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written(ChangeSet),
    /// Dry run: the file would have been rewritten
    WouldWrite(ChangeSet),
    SkippedUnmodified,
    SkippedBlacklisted,
}

/// Totals for a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub written: usize,
    pub would_write: usize,
    pub unmodified: usize,
    pub blacklisted: usize,
    pub failures: Vec<(PathBuf, ProcessingError)>,
}

impl BatchSummary {
    pub fn record(&mut self, path: PathBuf, result: Result<FileOutcome, ProcessingError>) {
        match result {
            Ok(FileOutcome::Written(_)) => self.written += 1,
            Ok(FileOutcome::WouldWrite(_)) => self.would_write += 1,
            Ok(FileOutcome::SkippedUnmodified) => self.unmodified += 1,
            Ok(FileOutcome::SkippedBlacklisted) => self.blacklisted += 1,
            Err(error) => self.failures.push((path, error)),
        }
    }

    pub fn processed(&self) -> usize {
        self.written + self.would_write + self.unmodified + self.blacklisted + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
