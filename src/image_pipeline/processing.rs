//! Processing module
//!
//! Orchestrates the per-file transforms and drives them over a batch of files.

mod batch;
mod file_processor;
pub mod types;

#[cfg(test)]
mod tests;

pub use batch::BatchProcessor;
pub use file_processor::FileProcessor;
pub use types::{
    BatchSummary, ChangeSet, FileOutcome, ProcessingConfig, ProcessingConfigBuilder,
};
