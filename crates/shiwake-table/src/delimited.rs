//! CSV sheets.
//!
//! Files are read as UTF-8 (with or without BOM) and fall back to
//! Shift_JIS/CP932 when that fails. They are always written as UTF-8 with
//! a BOM so spreadsheet applications pick the encoding up.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::SHIFT_JIS;

use crate::TableError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) type Grid = (Vec<String>, Vec<Vec<String>>);

/// Read headers and records.
pub(crate) fn read(path: &Path) -> Result<Grid, TableError> {
    let bytes = fs::read(path).map_err(|e| TableError::io(path, e))?;
    let text = decode(&bytes).ok_or_else(|| TableError::Decode {
        path: path.to_path_buf(),
    })?;
    parse(&text).map_err(|source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn decode(bytes: &[u8]) -> Option<Cow<'_, str>> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => Some(Cow::Borrowed(text)),
        Err(_) => SHIFT_JIS.decode_without_bom_handling_and_without_replacement(body),
    }
}

fn parse(text: &str) -> Result<Grid, ::csv::Error> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok((headers, records))
}

/// Write headers and records as UTF-8 with BOM.
pub(crate) fn write(path: &Path, headers: &[String], records: &[Vec<String>]) -> Result<(), TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = ::csv::WriterBuilder::new().flexible(true).from_writer(&mut buffer);
        writer.write_record(headers).map_err(csv_err)?;
        for record in records {
            writer.write_record(record).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| TableError::io(path, e))?;
    }

    fs::write(path, buffer).map_err(|e| TableError::io(path, e))
}
