//! Core types for shiwake.
//!
//! This crate holds the pure parts of the sorter: parsing and rendering
//! image filenames, resolving category labels from a metadata row or the
//! filename itself, and planning the destination folder for a file. It
//! also defines the [`Reporter`] capability the other crates log through.

mod category;
mod config;
mod error;
mod hash;
mod name;
mod plan;
mod report;
mod result;
mod row;

pub use category::{CategorySet, CategorySource, Resolution, Slot, normalize_label, resolve_categories};
pub use config::{ConflictPolicy, Mode, SortConfig, SortConfigBuilder, Transfer};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use hash::ContentHash;
pub use name::{FileNameRecord, IMAGE_EXTENSIONS, is_image_extension, normalize_name, parse_name};
pub use plan::{DestinationPlan, alternate_path, next_free_path, plan_destination, sanitize_segment};
pub use report::{RecordingReporter, Reporter, SkipReason, SortEvent, TracingReporter};
pub use result::{BatchResult, Counters, PlacedFile};
pub use row::{COLUMN_PREFIX, MetadataRow, RowIndex, RowMatch};
