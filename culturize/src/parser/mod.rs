//! CSV loader for redirect files.
//!
//! Reads a delimited file with a header row and turns each complete data row
//! into a [`RedirectRecord`]. Rows lacking `PID`, `document type` or `URL`
//! are skipped without error; only unreadable input fails.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::{COL_DOCTYPE, COL_ENABLED, COL_PID, COL_URL};
use crate::error::{LoaderError, LoaderResult};
use crate::models::RedirectRecord;

/// Options controlling how the CSV is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Field delimiter (default `,`).
    pub delimiter: u8,
    /// Drop rows whose `enabled` column is present and not `1`.
    pub respect_enabled: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            respect_enabled: false,
        }
    }
}

/// One data row as found in the file, before validation.
///
/// `None` means the column is absent from the header or the row is too
/// short; values are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub pid: Option<String>,
    pub document_type: Option<String>,
    pub url: Option<String>,
    pub enabled: Option<String>,
}

impl RawRow {
    /// Build a record if the three required fields are non-empty.
    pub fn to_record(&self) -> Option<RedirectRecord> {
        let pid = non_empty(&self.pid)?;
        let document_type = non_empty(&self.document_type)?;
        let url = non_empty(&self.url)?;
        RedirectRecord::new(pid, document_type, url)
    }

    /// `false` only when an `enabled` value exists and is not `1`.
    pub fn is_enabled(&self) -> bool {
        self.enabled.as_deref().map_or(true, |v| v == "1")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Positions of the known columns in the header.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnIndex {
    pid: Option<usize>,
    document_type: Option<usize>,
    url: Option<usize>,
    enabled: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            pid: find(COL_PID),
            document_type: find(COL_DOCTYPE),
            url: find(COL_URL),
            enabled: find(COL_ENABLED),
        }
    }

    fn row(&self, record: &csv::StringRecord) -> RawRow {
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::to_string);
        RawRow {
            line: record.position().map(|p| p.line()).unwrap_or(0),
            pid: field(self.pid),
            document_type: field(self.document_type),
            url: field(self.url),
            enabled: field(self.enabled),
        }
    }
}

/// Load redirect records from a file with default options.
pub fn load_records<P: AsRef<Path>>(path: P) -> LoaderResult<Vec<RedirectRecord>> {
    load_records_with(path, &LoaderOptions::default())
}

/// Load redirect records from a file.
pub fn load_records_with<P: AsRef<Path>>(
    path: P,
    options: &LoaderOptions,
) -> LoaderResult<Vec<RedirectRecord>> {
    let file = open(path.as_ref())?;
    read_records(file, options)
}

/// Read redirect records from any reader, preserving row order.
pub fn read_records<R: Read>(reader: R, options: &LoaderOptions) -> LoaderResult<Vec<RedirectRecord>> {
    let records = read_raw_rows(reader, options)?
        .iter()
        .filter(|row| !options.respect_enabled || row.is_enabled())
        .filter_map(RawRow::to_record)
        .collect();
    Ok(records)
}

/// Read every data row of a file without filtering.
pub fn load_raw_rows<P: AsRef<Path>>(path: P, options: &LoaderOptions) -> LoaderResult<Vec<RawRow>> {
    let file = open(path.as_ref())?;
    read_raw_rows(file, options)
}

/// Read every data row without filtering.
pub fn read_raw_rows<R: Read>(reader: R, options: &LoaderOptions) -> LoaderResult<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.headers()?);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        rows.push(columns.row(&result?));
    }
    Ok(rows)
}

fn open(path: &Path) -> LoaderResult<File> {
    File::open(path).map_err(|source| LoaderError::Open {
        path: path.to_path_buf(),
        source,
    })
}
