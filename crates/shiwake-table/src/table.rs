//! In-memory metadata sheet.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use shiwake_core::{MetadataRow, Reporter, RowIndex, SortEvent, alternate_path, next_free_path};

use crate::TableError;
use crate::{delimited, workbook};

/// Column naming the folder a row's images came from.
pub const COLUMN_IMG_DIR: &str = "img_dir";
/// Written back: folder the matching image was placed in.
pub const COLUMN_AFTER_DIR: &str = "after_dir";
/// Written back: final file name of the matching image.
pub const COLUMN_AFTER_FILENAME: &str = "after_filename";

/// On-disk format of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Csv,
    Xlsx,
}

impl TableKind {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if ext == "csv" {
            Some(Self::Csv)
        } else if workbook::EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Xlsx)
        } else {
            None
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// A loaded sheet: a header row and string cells.
///
/// Every record is cut or padded to the header width on load, so cells can be
/// addressed by column index without bounds juggling.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    kind: TableKind,
    path: PathBuf,
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl MetadataTable {
    /// Load a `.csv` or Excel sheet.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let kind = TableKind::from_path(path).ok_or_else(|| TableError::UnsupportedExtension {
            path: path.to_path_buf(),
        })?;

        let (headers, mut records) = match kind {
            TableKind::Csv => delimited::read(path)?,
            TableKind::Xlsx => workbook::read(path)?,
        };
        if headers.is_empty() {
            return Err(TableError::Empty {
                path: path.to_path_buf(),
            });
        }

        let width = headers.len();
        for record in &mut records {
            record.resize(width, String::new());
        }

        Ok(Self {
            kind,
            path: path.to_path_buf(),
            headers,
            records,
        })
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Where the sheet was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of a column by header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at a data row and column name.
    pub fn cell(&self, position: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.records.get(position)?.get(col).map(String::as_str)
    }

    /// Typed rows in sheet order.
    pub fn rows(&self) -> RowIndex {
        let columns: HashMap<&str, usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();

        let rows = self
            .records
            .iter()
            .map(|record| {
                MetadataRow::from_columns(|name| {
                    columns
                        .get(name)
                        .and_then(|&i| record.get(i))
                        .map(String::as_str)
                })
            })
            .collect();
        RowIndex::new(rows)
    }

    /// Distinct non-blank `img_dir` values in sheet order.
    pub fn image_dirs(&self) -> Vec<PathBuf> {
        let Some(col) = self.column(COLUMN_IMG_DIR) else {
            return Vec::new();
        };

        let mut dirs: Vec<PathBuf> = Vec::new();
        for record in &self.records {
            let value = record[col].trim();
            if value.is_empty() || value == "nan" {
                continue;
            }
            let dir = PathBuf::from(value);
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// Set a cell, appending the column when it does not exist yet.
    pub fn set_cell(&mut self, position: usize, name: &str, value: &str) {
        let col = self.ensure_column(name);
        if let Some(record) = self.records.get_mut(position) {
            record[col] = value.to_string();
        }
    }

    /// Record where a row's image ended up.
    pub fn set_after(&mut self, position: usize, after_dir: &str, after_filename: &str) {
        self.set_cell(position, COLUMN_AFTER_DIR, after_dir);
        self.set_cell(position, COLUMN_AFTER_FILENAME, after_filename);
    }

    /// Make sure the write-back columns exist, even if nothing was placed.
    pub fn ensure_after_columns(&mut self) {
        self.ensure_column(COLUMN_AFTER_DIR);
        self.ensure_column(COLUMN_AFTER_FILENAME);
    }

    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(col) = self.column(name) {
            return col;
        }
        self.headers.push(name.to_string());
        let width = self.headers.len();
        for record in &mut self.records {
            record.resize(width, String::new());
        }
        width - 1
    }

    /// Where the written-back copy goes. Workbooks are always written as
    /// plain `.xlsx`, so macro and template sources change extension.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        match self.kind {
            TableKind::Csv => suffixed_output_path(&self.path, suffix),
            TableKind::Xlsx => suffixed_output_path(&self.path.with_extension("xlsx"), suffix),
        }
    }

    /// Write the sheet to `path` in its original format.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        match self.kind {
            TableKind::Csv => delimited::write(path, &self.headers, &self.records),
            TableKind::Xlsx => workbook::write(path, &self.headers, &self.records),
        }
    }
}

/// Output path for a sheet: the stem gains `_<suffix>` unless it already
/// ends with it, then `_2`, `_3`, ... until free.
pub fn suffixed_output_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let stem = if stem.ends_with(suffix) {
        stem.into_owned()
    } else {
        format!("{stem}_{suffix}")
    };
    let file_name = match source.extension() {
        Some(ext) => format!("{stem}.{}", ext.to_string_lossy()),
        None => stem,
    };
    alternate_path(&source.with_file_name(file_name))
}

/// Save to the suffixed output path, retrying once under the next free
/// name when the first target is not writable.
///
/// Returns the path actually written, or `None` when both attempts failed.
/// Failures are reported, never returned.
pub fn save_with_fallback(table: &MetadataTable, suffix: &str, reporter: &dyn Reporter) -> Option<PathBuf> {
    let target = table.output_path(suffix);
    let err = match table.save(&target) {
        Ok(()) => {
            reporter.report(SortEvent::TableSaved { path: target.clone() });
            return Some(target);
        }
        Err(err) => err,
    };

    if !err.is_permission_denied() {
        reporter.report(SortEvent::TableSaveFailed {
            path: target,
            error: err.to_string(),
        });
        return None;
    }

    let retry = next_free_path(&target);
    match table.save(&retry) {
        Ok(()) => {
            reporter.report(SortEvent::TableSaved { path: retry.clone() });
            Some(retry)
        }
        Err(err) => {
            reporter.report(SortEvent::TableSaveFailed {
                path: retry,
                error: err.to_string(),
            });
            None
        }
    }
}
