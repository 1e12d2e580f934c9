//! Error type for file operations.

use std::path::PathBuf;

use thiserror::Error;

use shiwake_core::Transfer;

/// A failed file operation. Each variant names the path it failed on.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The destination directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source could not be hashed.
    #[error("Failed to hash {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination directory could not be listed.
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {from} -> {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Moving or copying into place failed.
    #[error("Failed to {transfer} {from} -> {to}: {source}")]
    Transfer {
        transfer: Transfer,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fresh placement found its target already taken.
    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Invalid file name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}
