//! Excel sheets.
//!
//! Reading goes through `calamine` and only looks at the first worksheet.
//! Writing produces a fresh single-sheet `.xlsx` with every cell stored as
//! a string.

use std::fs;
use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;

use crate::TableError;
use crate::delimited::Grid;

/// Extensions read as workbooks.
pub(crate) const EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xltx", "xltm"];

/// Read the first worksheet. The first row is the header.
pub(crate) fn read(path: &Path) -> Result<Grid, TableError> {
    let read_err = |source| TableError::XlsxRead {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(read_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::Empty {
            path: path.to_path_buf(),
        })?
        .map_err(read_err)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| TableError::Empty {
            path: path.to_path_buf(),
        })?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let records = rows
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    Ok((headers, records))
}

/// Write headers and records to a new workbook.
pub(crate) fn write(path: &Path, headers: &[String], records: &[Vec<String>]) -> Result<(), TableError> {
    let write_err = |source| TableError::XlsxWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (row, cells) in std::iter::once(headers).chain(records.iter().map(Vec::as_slice)).enumerate() {
        for (col, value) in cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet
                .write_string(row as u32, col as u16, value.as_str())
                .map_err(write_err)?;
        }
    }

    let buffer = workbook.save_to_buffer().map_err(write_err)?;
    fs::write(path, buffer).map_err(|e| TableError::io(path, e))
}
