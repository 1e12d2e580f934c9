//! Per-run counters and placement records.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Counts of what happened to each candidate in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub moved: usize,
    pub copied: usize,
    /// Sources renamed to their canonical name.
    pub renamed: usize,
    /// Placed under a `_N` name because the planned name was taken.
    pub suffixed: usize,
    pub overwritten: usize,
    pub skipped_unmatched: usize,
    pub skipped_too_small: usize,
    pub skipped_conflict: usize,
    pub skipped_duplicate: usize,
    /// Destinations computed during a dry run.
    pub planned: usize,
    pub failed: usize,
}

impl Counters {
    /// Files that ended up in the destination tree.
    pub fn placed(&self) -> usize {
        self.moved + self.copied
    }

    /// Files left where they were, for any reason.
    pub fn skipped(&self) -> usize {
        self.skipped_unmatched + self.skipped_too_small + self.skipped_conflict + self.skipped_duplicate
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "moved: {} / copied: {}", self.moved, self.copied)?;
        writeln!(
            f,
            "skipped_unmatched: {}  skipped_small: {}",
            self.skipped_unmatched, self.skipped_too_small
        )?;
        writeln!(
            f,
            "skipped_conflict: {}  skipped_hash_dup: {}",
            self.skipped_conflict, self.skipped_duplicate
        )?;
        writeln!(f, "overwritten: {}  dupped: {}", self.overwritten, self.suffixed)?;
        writeln!(
            f,
            "renamed: {}  planned: {}  failed: {}",
            self.renamed, self.planned, self.failed
        )?;
        write!(f, "total placed: {}  total skipped: {}", self.placed(), self.skipped())
    }
}

/// A file that reached its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedFile {
    /// Final path, including any `_N` suffix.
    pub path: PathBuf,
    /// Stem the categories were resolved from.
    pub stem: String,
    /// Prefix of the metadata row that supplied the categories.
    pub row_prefix: Option<String>,
}

/// Outcome of one sort run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub counters: Counters,
    /// Placements in processing order.
    pub placed: Vec<PlacedFile>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_totals() {
        let counters = Counters {
            moved: 3,
            copied: 1,
            skipped_unmatched: 2,
            skipped_duplicate: 1,
            ..Default::default()
        };
        assert_eq!(counters.placed(), 4);
        assert_eq!(counters.skipped(), 3);
        assert!(counters.to_string().ends_with("total placed: 4  total skipped: 3"));
    }

    #[test]
    fn test_summary_lists_every_counter() {
        let text = Counters::default().to_string();
        for label in ["moved", "copied", "skipped_unmatched", "skipped_small", "skipped_conflict", "skipped_hash_dup", "overwritten", "failed"] {
            assert!(text.contains(label), "missing {label}");
        }
    }
}
