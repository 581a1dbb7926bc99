use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::image_pipeline::common::error::Result;

pub const EXR_EXTENSION: &str = "exr";

/// Recursively lists `.exr` files, in file-name order.
pub struct DirectoryScanner {
    root: PathBuf,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn is_exr(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(EXR_EXTENSION))
    }

    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() && Self::is_exr(entry.path()) {
                files.push(entry.into_path());
            }
        }
        debug!("Found {} .{} files under {}", files.len(), EXR_EXTENSION, self.root.display());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::ProcessingError;
    use std::fs;

    #[test]
    fn test_scan_recurses_and_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("one.exr"), b"").unwrap();
        fs::write(dir.path().join("a/two.EXR"), b"").unwrap();
        fs::write(dir.path().join("a/b/three.exr"), b"").unwrap();
        fs::write(dir.path().join("a/notes.txt"), b"").unwrap();
        fs::create_dir_all(dir.path().join("folder.exr")).unwrap();

        let files = DirectoryScanner::new(dir.path()).scan().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a/b/three.exr"),
                PathBuf::from("a/two.EXR"),
                PathBuf::from("one.exr"),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let result = DirectoryScanner::new("/definitely/not/a/dir").scan();
        assert!(matches!(result, Err(ProcessingError::IoError(_))));
    }
}
