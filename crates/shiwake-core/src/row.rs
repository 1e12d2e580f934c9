//! Typed metadata rows and the prefix index used to match them to files.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::category::{CategorySet, Slot, normalize_label};

/// Column holding the filename prefix a row applies to.
pub const COLUMN_PREFIX: &str = "filename_prefix";

const COLUMN_POSE: &str = "factor_ポーズ";

/// Sheet column feeding each category slot.
const SLOT_COLUMNS: [(Slot, &str); 7] = [
    (Slot::Content, "content"),
    (Slot::Character, "character"),
    (Slot::Face, "factor_顔"),
    (Slot::Body, "factor_体・服装・小物"),
    (Slot::Background, "factor_背景環境"),
    (Slot::PhotoStyle, "factor_写真の写り方"),
    (Slot::Lighting, "factor_光雰囲気"),
];

/// One metadata sheet row, read once at ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    /// Trimmed `filename_prefix`; empty rows never match.
    pub prefix: String,
    pub categories: CategorySet,
    /// Pose descriptor. Read for completeness, never used for placement.
    pub pose: Option<CompactString>,
}

impl MetadataRow {
    /// Build a row from a column lookup. Missing columns are absent slots.
    pub fn from_columns<'a>(column: impl Fn(&str) -> Option<&'a str>) -> Self {
        let mut categories = CategorySet::new();
        for (slot, name) in SLOT_COLUMNS {
            if let Some(value) = column(name) {
                categories.set(slot, value);
            }
        }

        Self {
            prefix: column(COLUMN_PREFIX).map(str::trim).unwrap_or_default().to_string(),
            categories,
            pose: column(COLUMN_POSE).and_then(normalize_label),
        }
    }
}

/// A row selected for a stem, with its sheet position.
#[derive(Debug, Clone, Copy)]
pub struct RowMatch<'a> {
    pub row: &'a MetadataRow,
    /// Zero-based data row position in the sheet.
    pub position: usize,
}

/// Rows in sheet order, matched to stems by prefix.
#[derive(Debug, Clone, Default)]
pub struct RowIndex {
    rows: Vec<MetadataRow>,
}

impl RowIndex {
    /// Index rows in sheet order. Positions are the vector indices.
    pub fn new(rows: Vec<MetadataRow>) -> Self {
        Self { rows }
    }

    /// Find the row for a canonical stem.
    ///
    /// A row matches when its prefix equals the stem or is a string prefix
    /// of it. The longest matching prefix wins; among rows sharing that
    /// prefix the last in sheet order wins, as a later row overrides an
    /// earlier one with the same key.
    pub fn lookup(&self, stem: &str) -> Option<RowMatch<'_>> {
        let mut best: Option<RowMatch<'_>> = None;
        for (position, row) in self.rows.iter().enumerate() {
            if row.prefix.is_empty() || !stem.starts_with(row.prefix.as_str()) {
                continue;
            }
            if best.is_none_or(|b| row.prefix.len() >= b.row.prefix.len()) {
                best = Some(RowMatch { row, position });
            }
        }
        best
    }

    /// Whether any row has a usable prefix.
    pub fn has_keys(&self) -> bool {
        self.rows.iter().any(|r| !r.prefix.is_empty())
    }

    /// All rows in sheet order.
    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
