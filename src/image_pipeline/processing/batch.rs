use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info, instrument};

use crate::image_pipeline::{
    common::error::Result,
    container::{ExrFileReader, ExrFileWriter, ImageReader, ImageWriter},
    processing::{
        file_processor::FileProcessor,
        types::{BatchSummary, FileOutcome, ProcessingConfig},
    },
    scan::DirectoryScanner,
};

/// Feeds a list of files through a [`FileProcessor`].
///
/// Decode and encode failures are recorded per file and the batch carries on.
/// Configuration errors stop the batch immediately.
pub struct BatchProcessor<R: ImageReader, W: ImageWriter> {
    processor: FileProcessor<R, W>,
}

impl BatchProcessor<ExrFileReader, ExrFileWriter> {
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            processor: FileProcessor::new(config),
        }
    }
}

impl<R, W> BatchProcessor<R, W>
where
    R: ImageReader + Sync,
    W: ImageWriter + Sync,
{
    pub fn with_processor(processor: FileProcessor<R, W>) -> Self {
        Self { processor }
    }

    #[instrument(skip(self, root), fields(root = %root.as_ref().display()))]
    pub fn run_directory<P: AsRef<Path>>(&self, root: P) -> Result<BatchSummary> {
        let files = DirectoryScanner::new(root.as_ref()).scan()?;
        self.run(files)
    }

    pub fn run(&self, files: Vec<PathBuf>) -> Result<BatchSummary> {
        info!("Processing {} files", files.len());

        let results: Vec<(PathBuf, Result<FileOutcome>)> = if self.processor.config().parallel {
            files
                .into_par_iter()
                .map(|path| {
                    let result = self.processor.process_file(&path);
                    (path, result)
                })
                .collect()
        } else {
            let mut results = Vec::with_capacity(files.len());
            for path in files {
                let result = self.processor.process_file(&path);
                let fatal = matches!(&result, Err(e) if e.is_fatal());
                results.push((path, result));
                if fatal {
                    break;
                }
            }
            results
        };

        let mut summary = BatchSummary::default();
        for (path, result) in results {
            match result {
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    summary.record(path, Err(e));
                }
                outcome => summary.record(path, outcome),
            }
        }

        info!(
            written = summary.written,
            would_write = summary.would_write,
            unmodified = summary.unmodified,
            blacklisted = summary.blacklisted,
            failed = summary.failures.len(),
            "Batch complete"
        );
        Ok(summary)
    }
}
