//! Errors that stop a batch before any file is touched.

use std::path::PathBuf;

use thiserror::Error;

use shiwake_core::{IMAGE_EXTENSIONS, ScanError};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Nothing with an accepted extension under the source folder.
    #[error("No image files found in {root} (accepted: {})", IMAGE_EXTENSIONS.join(", "))]
    NoEligibleFiles { root: PathBuf },
}
