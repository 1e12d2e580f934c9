//! Error types for metadata sheets.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving a metadata sheet.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Unsupported sheet extension (expected .csv or .xlsx): {path}")]
    UnsupportedExtension { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Neither UTF-8 nor CP932.
    #[error("Could not decode {path} as UTF-8 or Shift_JIS")]
    Decode { path: PathBuf },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: ::csv::Error,
    },

    #[error("Could not read workbook {path}: {source}")]
    XlsxRead {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Could not build workbook {path}: {source}")]
    XlsxWrite {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// The sheet has no header row.
    #[error("Sheet has no header row: {path}")]
    Empty { path: PathBuf },
}

impl TableError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure was a permission problem on the target file.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::PermissionDenied)
    }
}
