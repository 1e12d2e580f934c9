//! Per-file sorting.

use std::path::{Path, PathBuf};

use shiwake_core::{
    BatchResult, CategorySource, FileNameRecord, PlacedFile, Reporter, RowIndex, SkipReason,
    SortConfig, SortEvent, Transfer, parse_name, plan_destination, resolve_categories,
};
use shiwake_ops::{
    Blake3Hasher, ConflictDecision, OpsError, apply, canonical_rename_target, rename_file, resolve_conflict,
};
use shiwake_scan::{Candidate, ImageScanner};

use crate::BatchError;

/// What happened to one candidate.
#[derive(Debug)]
pub enum Disposition {
    TooSmall,
    Unmatched,
    /// Dry run: the destination was computed, nothing was moved.
    Planned { destination: PathBuf },
    /// The file reached the destination tree. `source_retained` is set when
    /// a move could not remove its source afterwards.
    Placed {
        file: PlacedFile,
        decision: ConflictDecision,
        source_retained: bool,
    },
    Skipped(SkipReason),
    Failed(OpsError),
}

/// Outcome of one candidate, before counting.
#[derive(Debug)]
pub struct FileOutcome {
    /// The source was renamed to its canonical name.
    pub renamed: bool,
    pub disposition: Disposition,
}

impl FileOutcome {
    fn new(disposition: Disposition) -> Self {
        Self {
            renamed: false,
            disposition,
        }
    }
}

/// Sorts candidates under `config.source_dir`.
pub struct Sorter<'a> {
    config: &'a SortConfig,
    rows: Option<&'a RowIndex>,
    reporter: &'a dyn Reporter,
}

impl<'a> Sorter<'a> {
    pub fn new(config: &'a SortConfig, reporter: &'a dyn Reporter) -> Self {
        Self {
            config,
            rows: None,
            reporter,
        }
    }

    /// Resolve categories from these metadata rows before falling back to
    /// the filename.
    pub fn with_rows(mut self, rows: &'a RowIndex) -> Self {
        self.rows = Some(rows).filter(|r| r.has_keys());
        self
    }

    fn root(&self) -> &Path {
        &self.config.source_dir
    }

    /// Scan the source folder and sort everything found.
    pub fn sort_directory(&self) -> Result<BatchResult, BatchError> {
        let outcome = ImageScanner::new().scan(self.config)?;
        for warning in outcome.warnings {
            self.reporter.report(SortEvent::Unreadable {
                path: warning.path,
                error: warning.message,
            });
        }
        if outcome.candidates.is_empty() {
            return Err(BatchError::NoEligibleFiles {
                root: self.root().to_path_buf(),
            });
        }
        Ok(self.run(&outcome.candidates))
    }

    /// Sort candidates in the given order and tally the results.
    pub fn run(&self, candidates: &[Candidate]) -> BatchResult {
        let mut result = BatchResult::new();
        for candidate in candidates {
            let outcome = self.sort_one(candidate);
            self.tally(&mut result, outcome);
        }
        self.reporter.report(SortEvent::Summary(result.counters));
        result
    }

    /// Take one candidate from size check through placement.
    pub fn sort_one(&self, candidate: &Candidate) -> FileOutcome {
        let min = self.config.min_bytes;
        if candidate.size < min {
            self.reporter.report(SortEvent::TooSmall {
                path: candidate.path.clone(),
                size: candidate.size,
                min,
            });
            return FileOutcome::new(Disposition::TooSmall);
        }

        let Some(record) = candidate
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_name)
        else {
            self.reporter.report(SortEvent::Unmatched {
                path: candidate.path.clone(),
            });
            return FileOutcome::new(Disposition::Unmatched);
        };

        let (source, renamed) = self.canonicalize(&candidate.path, &record);
        FileOutcome {
            renamed,
            disposition: self.place(&source, &record),
        }
    }

    /// Give the source its canonical name. A dry run only reports the
    /// rename and continues as if it happened; a failed rename keeps the
    /// original name.
    fn canonicalize(&self, path: &Path, record: &FileNameRecord) -> (PathBuf, bool) {
        let Some(target) = canonical_rename_target(path, &record.render()) else {
            return (path.to_path_buf(), false);
        };

        if self.config.dry_run {
            self.reporter.report(SortEvent::RenamePlanned {
                from: path.to_path_buf(),
                to: target.clone(),
            });
            return (target, false);
        }

        match rename_file(path, &target) {
            Ok(()) => {
                self.reporter.report(SortEvent::Renamed {
                    from: path.to_path_buf(),
                    to: target.clone(),
                });
                (target, true)
            }
            Err(e) => {
                self.reporter.report(SortEvent::RenameFailed {
                    from: path.to_path_buf(),
                    to: target,
                    error: e.to_string(),
                });
                (path.to_path_buf(), false)
            }
        }
    }

    fn place(&self, source: &Path, record: &FileNameRecord) -> Disposition {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| record.render());
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| record.stem());

        let resolution = resolve_categories(record, &stem, self.rows);
        if resolution.source == CategorySource::Filename {
            self.reporter.report(SortEvent::FilenameFallback {
                path: source.to_path_buf(),
            });
        }

        let plan = plan_destination(
            self.config.mode,
            &resolution.categories,
            &record.date,
            self.config.batch_tag(),
            &file_name,
        );
        let planned = plan.path(self.root());
        self.reporter.report(SortEvent::Planned {
            source: source.to_path_buf(),
            destination: self.relative(&planned),
        });

        if self.config.dry_run {
            return Disposition::Planned { destination: planned };
        }

        let decision = match resolve_conflict(
            &planned,
            source,
            self.config.conflict_policy,
            &Blake3Hasher,
            self.reporter,
        ) {
            Ok(decision) => decision,
            Err(e) => return self.failed(source, e),
        };

        if let ConflictDecision::Skip(reason) = &decision {
            self.reporter.report(SortEvent::Skipped {
                path: source.to_path_buf(),
                reason: reason.clone(),
            });
            return Disposition::Skipped(reason.clone());
        }

        match apply(&decision, source, self.config.transfer, self.reporter) {
            Ok(placed) => {
                let (path, source_retained) = placed.map_or((planned, false), |p| (p.path, p.source_retained));
                self.reporter.report(SortEvent::Placed {
                    destination: self.relative(&path),
                    transfer: self.config.transfer,
                });
                let file = PlacedFile {
                    path,
                    stem,
                    row_prefix: resolution.source.row_prefix().map(str::to_string),
                };
                Disposition::Placed {
                    file,
                    decision,
                    source_retained,
                }
            }
            Err(e) => self.failed(source, e),
        }
    }

    fn failed(&self, source: &Path, error: OpsError) -> Disposition {
        self.reporter.report(SortEvent::PlaceFailed {
            path: source.to_path_buf(),
            error: error.to_string(),
        });
        Disposition::Failed(error)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.root()).unwrap_or(path).to_path_buf()
    }

    fn tally(&self, result: &mut BatchResult, outcome: FileOutcome) {
        let counters = &mut result.counters;
        if outcome.renamed {
            counters.renamed += 1;
        }

        match outcome.disposition {
            Disposition::TooSmall => counters.skipped_too_small += 1,
            Disposition::Unmatched => counters.skipped_unmatched += 1,
            Disposition::Planned { .. } => counters.planned += 1,
            Disposition::Skipped(SkipReason::DuplicateContent { .. }) => counters.skipped_duplicate += 1,
            Disposition::Skipped(SkipReason::ExistingFile | SkipReason::AlreadyInPlace) => {
                counters.skipped_conflict += 1;
            }
            Disposition::Failed(_) => counters.failed += 1,
            Disposition::Placed {
                file,
                decision,
                source_retained,
            } => {
                // A move that left its source behind produced a copy.
                match self.config.transfer {
                    Transfer::Move if !source_retained => counters.moved += 1,
                    Transfer::Move | Transfer::Copy => counters.copied += 1,
                }
                match decision {
                    ConflictDecision::PlaceAlternate(_) => counters.suffixed += 1,
                    ConflictDecision::Overwrite(_) => counters.overwritten += 1,
                    ConflictDecision::Place(_) | ConflictDecision::Skip(_) => {}
                }
                result.placed.push(file);
            }
        }
    }
}
