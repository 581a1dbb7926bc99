use std::path::Path;

use tracing::info;

use crate::image_pipeline::common::error::{ProcessingError, Result};

/// Path substrings excluded from processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    entries: Vec<String>,
}

impl Blacklist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(Into::into)
                .filter(|entry: &String| !entry.is_empty())
                .collect(),
        }
    }

    /// One substring per line. Lines are trimmed and blank lines skipped,
    /// since an empty substring would match every path.
    pub fn parse(contents: &str) -> Self {
        Self::new(contents.lines().map(str::trim))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ProcessingError::BlacklistReadError {
                path: path.display().to_string(),
                source,
            })?;
        let blacklist = Self::parse(&contents);
        info!("Loaded {} blacklisted paths.", blacklist.len());
        Ok(blacklist)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Matches against the resolved absolute form of `path`.
    ///
    /// Falls back to the lexically absolute path when the file cannot be
    /// canonicalized (it may not exist yet).
    pub fn matches(&self, path: &Path) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let resolved = std::fs::canonicalize(path)
            .or_else(|_| std::path::absolute(path))
            .unwrap_or_else(|_| path.to_path_buf());
        let resolved = resolved.to_string_lossy();
        self.entries.iter().any(|entry| resolved.contains(entry.as_str()))
    }
}
