//! Metadata sheet adapters for shiwake.
//!
//! A metadata sheet is a CSV file or the first worksheet of an Excel
//! workbook. It is loaded into a [`MetadataTable`] of string cells, turned
//! into typed rows for category resolution, and saved back with the
//! `after_dir` / `after_filename` columns filled in.
//!
//! ```no_run
//! use shiwake_table::MetadataTable;
//!
//! let table = MetadataTable::load("sheet_SFW.csv".as_ref()).unwrap();
//! let rows = table.rows();
//! println!("{} rows", rows.len());
//! ```

mod delimited;
mod error;
mod locate;
mod table;
mod workbook;

pub use error::TableError;
pub use locate::{common_parent, discover_source_root};
pub use table::{
    COLUMN_AFTER_DIR, COLUMN_AFTER_FILENAME, COLUMN_IMG_DIR, MetadataTable, TableKind, save_with_fallback,
    suffixed_output_path,
};
