//! Conflict detection and resolution for planned placements.

use std::fs;
use std::path::{Path, PathBuf};

use shiwake_core::{ConflictPolicy, Reporter, SkipReason, alternate_path};

use crate::OpsError;
use crate::hash::{ContentHasher, find_same_content};

/// Where (or whether) a file may be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictDecision {
    /// The planned path is free.
    Place(PathBuf),
    /// The planned path is taken; use this `_N` sibling instead.
    PlaceAlternate(PathBuf),
    /// Leave the source alone.
    Skip(SkipReason),
    /// Replace the file at this path.
    Overwrite(PathBuf),
}

impl ConflictDecision {
    /// Path the file will be written to, unless skipped.
    pub fn target(&self) -> Option<&Path> {
        match self {
            Self::Place(path) | Self::PlaceAlternate(path) | Self::Overwrite(path) => Some(path),
            Self::Skip(_) => None,
        }
    }
}

/// Decide how `source` may be placed at `planned`.
///
/// The destination directory is created first. Under
/// [`ConflictPolicy::Hash`] the directory is searched for identical
/// content before names are compared; without a content match the policy
/// behaves like [`ConflictPolicy::Dup`].
pub fn resolve_conflict(
    planned: &Path,
    source: &Path,
    policy: ConflictPolicy,
    hasher: &dyn ContentHasher,
    reporter: &dyn Reporter,
) -> Result<ConflictDecision, OpsError> {
    let dir = planned.parent().unwrap_or(Path::new(""));
    fs::create_dir_all(dir).map_err(|source| OpsError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    if planned == source {
        return Ok(ConflictDecision::Skip(SkipReason::AlreadyInPlace));
    }

    if policy == ConflictPolicy::Hash {
        let hash_err = |e| OpsError::Hash {
            path: source.to_path_buf(),
            source: e,
        };
        let size = fs::metadata(source).map_err(hash_err)?.len();
        let digest = hasher.hash_file(source).map_err(hash_err)?;
        if let Some(existing) = find_same_content(dir, size, &digest, source, hasher, reporter)? {
            return Ok(ConflictDecision::Skip(SkipReason::DuplicateContent { existing }));
        }
    }

    if !planned.exists() {
        return Ok(ConflictDecision::Place(planned.to_path_buf()));
    }

    Ok(match policy {
        ConflictPolicy::Skip => ConflictDecision::Skip(SkipReason::ExistingFile),
        ConflictPolicy::Overwrite => ConflictDecision::Overwrite(planned.to_path_buf()),
        ConflictPolicy::Dup | ConflictPolicy::Hash => ConflictDecision::PlaceAlternate(alternate_path(planned)),
    })
}
