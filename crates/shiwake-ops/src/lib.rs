//! File operations for shiwake.
//!
//! This crate decides where a planned file may land ([`resolve_conflict`])
//! and then puts it there ([`apply`]), plus the canonical rename performed
//! on source files before they are categorized. All operations are
//! synchronous; the sorter drives them one file at a time.

mod conflict;
mod error;
mod hash;
mod place;
mod rename;

pub use conflict::{ConflictDecision, resolve_conflict};
pub use error::OpsError;
pub use hash::{Blake3Hasher, ContentHasher, find_same_content};
pub use place::{Placement, apply, transfer_file};
pub use rename::{canonical_rename_target, rename_file, validate_filename};
