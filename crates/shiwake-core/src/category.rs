//! Category slots and their resolution from a row or a filename.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::name::FileNameRecord;
use crate::row::{RowIndex, RowMatch};

/// One level of the category hierarchy, in nesting order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
    Mode,
    Content,
    Character,
    Face,
    Body,
    Background,
    PhotoStyle,
    Lighting,
}

impl Slot {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        self as usize
    }
}

/// Ordered slot labels. Absent slots hold `None`, never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    labels: [Option<CompactString>; Slot::COUNT],
}

impl CategorySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a slot, normalizing the value. Blank values clear the slot.
    pub fn set(&mut self, slot: Slot, value: &str) {
        self.labels[slot.index()] = normalize_label(value);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, slot: Slot, value: &str) -> Self {
        self.set(slot, value);
        self
    }

    /// Label for a slot, if present.
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.labels[slot.index()].as_deref()
    }

    /// Whether a slot holds a label.
    pub fn contains(&self, slot: Slot) -> bool {
        self.labels[slot.index()].is_some()
    }

    /// Present labels in nesting order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &str)> {
        Slot::iter().filter_map(move |slot| self.get(slot).map(|label| (slot, label)))
    }

    /// Number of present slots.
    pub fn len(&self) -> usize {
        self.labels.iter().filter(|l| l.is_some()).count()
    }

    /// Whether no slot is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trim a label and map the spreadsheet blanks (`""`, `nan`, `None`) to absent.
pub fn normalize_label(value: &str) -> Option<CompactString> {
    match value.trim() {
        "" | "nan" | "None" => None,
        trimmed => Some(CompactString::from(trimmed)),
    }
}

/// Where a file's categories came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategorySource {
    /// A metadata row whose prefix matched the canonical stem.
    Row {
        /// The matching `filename_prefix`.
        prefix: String,
        /// Zero-based data row position in the sheet.
        position: usize,
    },
    /// No row matched; labels were taken from the filename.
    Filename,
}

impl CategorySource {
    /// Prefix of the matching row, if any.
    pub fn row_prefix(&self) -> Option<&str> {
        match self {
            Self::Row { prefix, .. } => Some(prefix),
            Self::Filename => None,
        }
    }
}

/// Categories for one file plus their provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub categories: CategorySet,
    pub source: CategorySource,
}

/// Resolve categories for a parsed file.
///
/// `stem` is the canonical stem the file carries on disk, which may differ
/// from [`FileNameRecord::stem`] when a rename collision added a suffix.
pub fn resolve_categories(record: &FileNameRecord, stem: &str, rows: Option<&RowIndex>) -> Resolution {
    if let Some(RowMatch { row, position }) = rows.and_then(|index| index.lookup(stem)) {
        return Resolution {
            categories: row.categories.clone(),
            source: CategorySource::Row {
                prefix: row.prefix.clone(),
                position,
            },
        };
    }

    let categories = CategorySet::new()
        .with(Slot::Content, &record.content)
        .with(Slot::Character, &record.character)
        .with(Slot::Face, &record.face)
        .with(Slot::Body, &record.middle);

    Resolution {
        categories,
        source: CategorySource::Filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::parse_name;
    use crate::row::MetadataRow;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  x "), Some("x".into()));
        assert_eq!(normalize_label(""), None);
        assert_eq!(normalize_label(" nan"), None);
        assert_eq!(normalize_label("None"), None);
        assert_eq!(normalize_label("none"), Some("none".into()));
    }

    #[test]
    fn test_slot_order_and_names() {
        let names: Vec<String> = Slot::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            ["mode", "content", "character", "face", "body", "background", "photo-style", "lighting"]
        );
    }

    #[test]
    fn test_iter_skips_absent() {
        let set = CategorySet::new()
            .with(Slot::Lighting, "dusk")
            .with(Slot::Content, "a")
            .with(Slot::Background, "nan");
        let present: Vec<_> = set.iter().collect();
        assert_eq!(present, vec![(Slot::Content, "a"), (Slot::Lighting, "dusk")]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_filename_fallback() {
        let record = parse_name("20240102_illustA_charX_faceY_poseZ_00017.png").unwrap();
        let resolution = resolve_categories(&record, &record.stem(), None);
        assert_eq!(resolution.source, CategorySource::Filename);
        assert_eq!(resolution.categories.get(Slot::Content), Some("illustA"));
        assert_eq!(resolution.categories.get(Slot::Character), Some("charX"));
        assert_eq!(resolution.categories.get(Slot::Face), Some("faceY"));
        assert_eq!(resolution.categories.get(Slot::Body), Some("poseZ"));
        assert!(!resolution.categories.contains(Slot::Background));
        assert!(!resolution.categories.contains(Slot::PhotoStyle));
        assert!(!resolution.categories.contains(Slot::Lighting));
    }

    #[test]
    fn test_row_sourced_ignores_filename() {
        let record = parse_name("20240102_illustA_charX_faceY_poseZ_00017.png").unwrap();
        let row = MetadataRow {
            prefix: "20240102_illustA".into(),
            categories: CategorySet::new().with(Slot::Content, "sheet-content"),
            pose: Some("standing".into()),
        };
        let index = RowIndex::new(vec![row]);
        let resolution = resolve_categories(&record, &record.stem(), Some(&index));
        assert_eq!(resolution.source.row_prefix(), Some("20240102_illustA"));
        assert_eq!(resolution.categories.get(Slot::Content), Some("sheet-content"));
        assert!(!resolution.categories.contains(Slot::Body));
    }
}
