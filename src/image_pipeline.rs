//! EXR recompression pipeline module
//!
//! This module provides the container view of EXR files, the pure per-file
//! transforms, input discovery and the orchestration that ties them together.

pub mod common;
pub mod container;
pub mod processing;
pub mod scan;
pub mod transforms;

pub use common::{
    ProcessingError,
    Result,
};

pub use container::{
    Channel,
    ChannelSet,
    Codec,
    ExrFileReader,
    ExrFileWriter,
    Header,
    ImageAsset,
    ImageReader,
    ImageWriter,
    SampleBuffer,
};

pub use processing::{
    BatchProcessor,
    BatchSummary,
    ChangeSet,
    FileOutcome,
    FileProcessor,
    ProcessingConfig,
    ProcessingConfigBuilder,
};

pub use scan::{
    Blacklist,
    DirectoryScanner,
};
