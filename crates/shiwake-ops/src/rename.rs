//! Canonical renaming of source files.

use std::fs;
use std::path::{Path, PathBuf};

use shiwake_core::alternate_path;

use crate::OpsError;

/// Where `source` should be renamed to carry `canonical` as its name.
///
/// Returns `None` when the file already has that name. A name taken by a
/// different file gets the `_N` treatment.
pub fn canonical_rename_target(source: &Path, canonical: &str) -> Option<PathBuf> {
    if source.file_name().is_some_and(|name| name == canonical) {
        return None;
    }
    Some(alternate_path(&source.with_file_name(canonical)))
}

/// Rename `from` to `to` within the same directory.
pub fn rename_file(from: &Path, to: &Path) -> Result<(), OpsError> {
    let name = to.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    validate_filename(&name).map_err(|reason| OpsError::InvalidName {
        name: name.to_string(),
        reason,
    })?;

    if to.exists() {
        return Err(OpsError::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "target already exists"),
        });
    }

    fs::rename(from, to).map_err(|source| OpsError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Validate a filename for cross-platform compatibility.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 bytes)".into());
    }

    for c in ['/', '\0'] {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c.escape_default()));
        }
    }

    #[cfg(target_os = "windows")]
    {
        for c in ['\\', ':', '*', '?', '"', '<', '>', '|'] {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{}'", c));
            }
        }
    }

    if name.ends_with('.') {
        return Err("Name cannot end with a dot".into());
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    Ok(())
}
