//! Destination folder planning and free-name selection.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::category::{CategorySet, Slot};
use crate::config::Mode;

const FILLER: char = '_';

/// Relative destination for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationPlan {
    /// Sanitized folder names, outermost first.
    pub segments: Vec<CompactString>,
    pub file_name: String,
}

impl DestinationPlan {
    /// Destination directory under `root`.
    pub fn directory(&self, root: &Path) -> PathBuf {
        self.segments.iter().fold(root.to_path_buf(), |dir, s| dir.join(s.as_str()))
    }

    /// Full destination path under `root`.
    pub fn path(&self, root: &Path) -> PathBuf {
        self.directory(root).join(&self.file_name)
    }

    /// Directory relative to the root, `/`-joined.
    pub fn relative_dir(&self) -> String {
        self.segments.join("/")
    }
}

/// Make a label safe to use as exactly one folder name.
///
/// Separators and NUL become `_`, and `.`/`..` have their dots replaced.
/// Returns `None` when nothing is left after trimming.
pub fn sanitize_segment(label: &str) -> Option<CompactString> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: CompactString = trimmed
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { FILLER } else { c })
        .collect();
    if cleaned == "." || cleaned == ".." {
        return Some(cleaned.replace('.', "_").into());
    }
    Some(cleaned)
}

/// Plan the destination of a file.
///
/// Folders nest as `mode`, the category slots in order, the date and then
/// the batch tag. Absent slots are skipped without leaving a gap.
pub fn plan_destination(
    mode: Mode,
    categories: &CategorySet,
    date: &str,
    batch_tag: Option<&str>,
    file_name: &str,
) -> DestinationPlan {
    let labels = std::iter::once(mode.as_ref())
        .chain(categories.iter().filter(|(slot, _)| *slot != Slot::Mode).map(|(_, label)| label))
        .chain(std::iter::once(date))
        .chain(batch_tag);

    DestinationPlan {
        segments: labels.filter_map(sanitize_segment).collect(),
        file_name: file_name.to_string(),
    }
}

/// Return `path` if free, else the first free `stem_N.ext` with `N >= 2`.
pub fn alternate_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    next_free_path(path)
}

/// First free `stem_N.ext` with `N >= 2`, ignoring whether `path` is free.
pub fn next_free_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new(""));
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy());

    (2u64..)
        .map(|i| match &extension {
            Some(ext) => parent.join(format!("{stem}_{i}.{ext}")),
            None => parent.join(format!("{stem}_{i}")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
