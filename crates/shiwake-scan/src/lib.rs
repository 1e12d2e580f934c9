//! Candidate image enumeration for shiwake.
//!
//! Walks the source directory (optionally recursively) with jwalk and
//! returns every regular file with an accepted image extension, sorted by
//! path so that a run is deterministic for a given filesystem snapshot.
//!
//! # Example
//!
//! ```rust,no_run
//! use shiwake_scan::{ImageScanner, SortConfig};
//!
//! let config = SortConfig::new("/path/to/images");
//! let outcome = ImageScanner::new().scan(&config).unwrap();
//!
//! for candidate in &outcome.candidates {
//!     println!("{} ({} bytes)", candidate.path.display(), candidate.size);
//! }
//! ```

mod scanner;

pub use scanner::{Candidate, ImageScanner, ScanOutcome};

// Re-export core types for convenience
pub use shiwake_core::{IMAGE_EXTENSIONS, ScanError, ScanWarning, SortConfig, WarningKind};
