//! Batch orchestration for shiwake.
//!
//! [`Sorter`] drives every candidate through parse, canonical rename,
//! category resolution, destination planning and placement, one file at a
//! time, and tallies a [`BatchResult`](shiwake_core::BatchResult).
//! [`back_references`] turns that result into the `after_dir` /
//! `after_filename` values written back to the metadata sheet.

mod backref;
mod error;
mod sorter;

pub use backref::{BackReference, back_references};
pub use error::BatchError;
pub use sorter::{Disposition, FileOutcome, Sorter};
