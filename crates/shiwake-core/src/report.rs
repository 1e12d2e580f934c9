//! Reporting of per-file decisions.
//!
//! Sorting code never logs directly; it hands [`SortEvent`]s to a
//! [`Reporter`] supplied by the caller. [`TracingReporter`] forwards them
//! to `tracing`, [`RecordingReporter`] keeps them for inspection.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;

use crate::config::Transfer;
use crate::result::Counters;

/// Why a file was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Identical bytes already sit in the destination folder.
    DuplicateContent { existing: PathBuf },
    /// The destination name is taken and the policy is `skip`.
    ExistingFile,
    /// The file already is at its planned destination.
    AlreadyInPlace,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateContent { existing } => write!(f, "duplicate content of {}", existing.display()),
            Self::ExistingFile => write!(f, "existing file"),
            Self::AlreadyInPlace => write!(f, "already in place"),
        }
    }
}

/// Something worth a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortEvent {
    /// An entry could not be read while enumerating candidates.
    Unreadable { path: PathBuf, error: String },
    /// Source smaller than the configured minimum.
    TooSmall { path: PathBuf, size: u64, min: u64 },
    /// Name does not fit the filename grammar.
    Unmatched { path: PathBuf },
    /// Dry run: the source would be renamed.
    RenamePlanned { from: PathBuf, to: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    /// Rename failed; the original name is kept.
    RenameFailed { from: PathBuf, to: PathBuf, error: String },
    /// No metadata row matched; categories come from the filename.
    FilenameFallback { path: PathBuf },
    /// Destination chosen (relative to the root).
    Planned { source: PathBuf, destination: PathBuf },
    Skipped { path: PathBuf, reason: SkipReason },
    /// An existing destination is about to be replaced.
    Overwriting { destination: PathBuf },
    Placed { destination: PathBuf, transfer: Transfer },
    PlaceFailed { path: PathBuf, error: String },
    /// A destination-folder entry could not be hashed and was ignored.
    HashUnreadable { path: PathBuf, error: String },
    /// Copied into place but the source could not be removed.
    SourceRetained { path: PathBuf, error: String },
    TableSaved { path: PathBuf },
    TableSaveFailed { path: PathBuf, error: String },
    /// End of run.
    Summary(Counters),
}

/// Sink for [`SortEvent`]s.
pub trait Reporter {
    fn report(&self, event: SortEvent);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, event: SortEvent) {
        (**self).report(event);
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: SortEvent) {
        match event {
            SortEvent::Unreadable { path, error } => {
                tracing::warn!("could not read, ignored: {} ({error})", path.display());
            }
            SortEvent::TooSmall { path, size, min } => {
                tracing::warn!("too small, skipped ({size} bytes < {min}): {}", path.display());
            }
            SortEvent::Unmatched { path } => {
                tracing::warn!("name does not match the naming rule, skipped: {}", path.display());
            }
            SortEvent::RenamePlanned { from, to } => {
                tracing::info!("   will rename to canonical name: {} -> {}", file_name(&from), file_name(&to));
            }
            SortEvent::Renamed { from, to } => {
                tracing::info!("   renamed: {} -> {}", file_name(&from), file_name(&to));
            }
            SortEvent::RenameFailed { from, to, error } => {
                tracing::error!("   rename failed: {} -> {} ({error})", file_name(&from), file_name(&to));
            }
            SortEvent::FilenameFallback { path } => {
                tracing::info!("   no metadata row matched, using filename categories: {}", file_name(&path));
            }
            SortEvent::Planned { source, destination } => {
                tracing::info!("→ {}  ->  {}", source.display(), destination.display());
            }
            SortEvent::Skipped { path, reason } => {
                tracing::info!("   skipped ({reason}): {}", path.display());
            }
            SortEvent::Overwriting { destination } => {
                tracing::info!("   replacing existing (overwrite): {}", destination.display());
            }
            SortEvent::Placed { destination, transfer } => {
                tracing::info!("   done ({transfer}): {}", destination.display());
            }
            SortEvent::PlaceFailed { path, error } => {
                tracing::error!("   failed: {} ({error})", path.display());
            }
            SortEvent::HashUnreadable { path, error } => {
                tracing::warn!("   could not hash {}, ignored for dedup ({error})", path.display());
            }
            SortEvent::SourceRetained { path, error } => {
                tracing::warn!("   copied but could not remove source {} ({error})", path.display());
            }
            SortEvent::TableSaved { path } => {
                tracing::info!("metadata sheet saved: {}", path.display());
            }
            SortEvent::TableSaveFailed { path, error } => {
                tracing::error!("failed to save metadata sheet: {} ({error})", path.display());
            }
            SortEvent::Summary(counters) => {
                tracing::info!("=== summary ===");
                for line in counters.to_string().lines() {
                    tracing::info!("{line}");
                }
            }
        }
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<SortEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events so far.
    pub fn events(&self) -> Vec<SortEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&SortEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: SortEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter() {
        let reporter = RecordingReporter::new();
        reporter.report(SortEvent::Unmatched { path: "a.png".into() });
        reporter.report(SortEvent::Skipped {
            path: "b.png".into(),
            reason: SkipReason::ExistingFile,
        });

        assert_eq!(reporter.events().len(), 2);
        assert_eq!(reporter.count(|e| matches!(e, SortEvent::Unmatched { .. })), 1);
    }

    #[test]
    fn test_reporter_by_reference() {
        fn emit(reporter: impl Reporter) {
            reporter.report(SortEvent::Summary(Counters::default()));
        }
        let reporter = RecordingReporter::new();
        emit(&reporter);
        assert_eq!(reporter.events(), vec![SortEvent::Summary(Counters::default())]);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::ExistingFile.to_string(), "existing file");
        let dup = SkipReason::DuplicateContent { existing: "x/a.png".into() };
        assert!(dup.to_string().starts_with("duplicate content"));
    }
}
