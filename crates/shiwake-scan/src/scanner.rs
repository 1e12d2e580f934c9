//! JWalk-based image enumeration.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use serde::{Deserialize, Serialize};

use shiwake_core::{ScanError, ScanWarning, SortConfig, WarningKind, is_image_extension};

/// An image file found under the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub path: PathBuf,
    /// Size in bytes at scan time.
    pub size: u64,
}

/// Everything a scan found.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Candidates in lexicographic path order.
    pub candidates: Vec<Candidate>,
    /// Entries that could not be read.
    pub warnings: Vec<ScanWarning>,
}

impl ScanOutcome {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Finds candidate images under a source directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageScanner;

impl ImageScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Enumerate images under `config.source_dir`.
    ///
    /// Only the directory itself is read unless `config.recursive` is set.
    /// Hidden files are included; symlinks are not followed.
    pub fn scan(&self, config: &SortConfig) -> Result<ScanOutcome, ScanError> {
        let root = config.source_dir.as_path();
        let metadata = std::fs::metadata(root).map_err(|e| ScanError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root.to_path_buf() });
        }

        let walker = WalkDir::new(root)
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(1)
            .max_depth(if config.recursive { usize::MAX } else { 1 });

        let mut outcome = ScanOutcome::default();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    outcome.warnings.push(ScanWarning::read_error(path, &err, err.io_error()));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !has_image_extension(&path) {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => outcome.candidates.push(Candidate {
                    path,
                    size: metadata.len(),
                }),
                Err(err) => outcome.warnings.push(ScanWarning::new(
                    &path,
                    err.to_string(),
                    WarningKind::MetadataError,
                )),
            }
        }

        outcome.candidates.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(outcome)
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_image_extension)
}
