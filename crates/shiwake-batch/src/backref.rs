//! Sheet write-back values.

use std::path::PathBuf;

use shiwake_core::{BatchResult, PlacedFile, RowIndex};

/// Where the image for one sheet row ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackReference {
    /// Zero-based data row position in the sheet.
    pub position: usize,
    /// Absolute folder the image was placed in.
    pub after_dir: PathBuf,
    pub after_filename: String,
}

/// Compute write-back values for every row that resolved a placed file.
///
/// A file belongs to the row key that supplied its categories. Each row
/// with that key gets the file whose stem equals the key, or else the
/// first such file in processing order. Rows without a placed file are
/// left out.
pub fn back_references(result: &BatchResult, rows: &RowIndex) -> Vec<BackReference> {
    rows.rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.prefix.is_empty())
        .filter_map(|(position, row)| {
            let file = pick(&result.placed, &row.prefix)?;
            Some(BackReference {
                position,
                after_dir: file.path.parent().map(PathBuf::from).unwrap_or_default(),
                after_filename: file
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

fn pick<'a>(placed: &'a [PlacedFile], prefix: &str) -> Option<&'a PlacedFile> {
    let mut attributed = placed.iter().filter(|f| f.row_prefix.as_deref() == Some(prefix));
    let first = attributed.next()?;
    if first.stem == prefix {
        return Some(first);
    }
    attributed.find(|f| f.stem == prefix).or(Some(first))
}
