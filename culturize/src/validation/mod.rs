//! Row diagnostics for redirect CSV files.
//!
//! The loader silently drops incomplete rows. This module explains what is
//! wrong with each row instead, using stable diagnostic codes:
//!
//! | code | meaning |
//! |------|---------|
//! | E01 | PID empty or has characters outside `[A-Za-z0-9_-]` |
//! | E02 | document type has characters outside `[A-Za-z0-9_-]` |
//! | E03 | document type missing |
//! | E04 | URL is not an absolute http(s) URL |
//! | E05 | `enabled` is neither `0` nor `1` |
//! | E06 | URL did not answer `200` to a HEAD request |
//! | E07 | `document type/PID` repeats an earlier row (case-insensitive) |
//!
//! Diagnostics never change what `convert` writes.

pub mod url_check;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{LoaderResult, ReportError};
use crate::parser::{load_raw_rows, LoaderOptions, RawRow};
use crate::pipeline::write_file;

pub use url_check::check_urls;

static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid segment pattern"));

// =============================================================================
// Diagnostic codes
// =============================================================================

/// A problem found on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticCode {
    #[serde(rename = "E01")]
    InvalidPid,
    #[serde(rename = "E02")]
    InvalidDocumentType,
    #[serde(rename = "E03")]
    MissingDocumentType,
    #[serde(rename = "E04")]
    InvalidUrl,
    #[serde(rename = "E05")]
    InvalidEnabled,
    #[serde(rename = "E06")]
    UnreachableUrl,
    #[serde(rename = "E07")]
    Duplicate,
}

impl DiagnosticCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPid => "E01",
            Self::InvalidDocumentType => "E02",
            Self::MissingDocumentType => "E03",
            Self::InvalidUrl => "E04",
            Self::InvalidEnabled => "E05",
            Self::UnreachableUrl => "E06",
            Self::Duplicate => "E07",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidPid => "PID is empty or has invalid characters",
            Self::InvalidDocumentType => "document type has invalid characters",
            Self::MissingDocumentType => "no document type",
            Self::InvalidUrl => "invalid URL",
            Self::InvalidEnabled => "enabled is not 0 or 1",
            Self::UnreachableUrl => "URL unavailable",
            Self::Duplicate => "duplicate document type/PID combination",
        }
    }
}

// =============================================================================
// Row diagnostics
// =============================================================================

/// Everything known about one data row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDiagnostic {
    /// 1-based line in the source file.
    pub line: u64,
    pub pid: String,
    pub document_type: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<String>,
    /// Whether `convert` would emit a rule for this row.
    pub convertible: bool,
    pub codes: Vec<DiagnosticCode>,
    /// Line of the first row with the same redirect path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<u64>,
    /// `None` until URLs are checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_reachable: Option<bool>,
}

impl RowDiagnostic {
    pub fn is_valid(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn has(&self, code: DiagnosticCode) -> bool {
        self.codes.contains(&code)
    }

    /// `E01, E04` style list.
    pub fn code_list(&self) -> String {
        self.codes
            .iter()
            .map(DiagnosticCode::code)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn inspect_row(row: &RawRow) -> RowDiagnostic {
    let pid = row.pid.clone().unwrap_or_default();
    let document_type = row.document_type.clone().unwrap_or_default();
    let url = row.url.clone().unwrap_or_default();

    let mut codes = Vec::new();

    if !SEGMENT_RE.is_match(&pid) {
        codes.push(DiagnosticCode::InvalidPid);
    }

    if document_type.is_empty() {
        codes.push(DiagnosticCode::MissingDocumentType);
    } else if !SEGMENT_RE.is_match(&document_type) {
        codes.push(DiagnosticCode::InvalidDocumentType);
    }

    if !is_web_url(&url) {
        codes.push(DiagnosticCode::InvalidUrl);
    }

    if let Some(enabled) = row.enabled.as_deref() {
        if enabled != "0" && enabled != "1" {
            codes.push(DiagnosticCode::InvalidEnabled);
        }
    }

    RowDiagnostic {
        line: row.line,
        pid,
        document_type,
        url,
        enabled: row.enabled.clone(),
        convertible: row.to_record().is_some(),
        codes,
        duplicate_of: None,
        url_reachable: None,
    }
}

/// Absolute `http`/`https` URL with a host.
pub fn is_web_url(url: &str) -> bool {
    match reqwest::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

// =============================================================================
// Report
// =============================================================================

/// Result of validating a whole file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub total_rows: usize,
    pub convertible_rows: usize,
    pub rows_with_problems: usize,
    pub rows: Vec<RowDiagnostic>,
}

impl ValidationReport {
    fn from_rows(rows: Vec<RowDiagnostic>, source: Option<PathBuf>) -> Self {
        let mut report = Self {
            source,
            generated_at: Utc::now().to_rfc3339(),
            total_rows: rows.len(),
            convertible_rows: 0,
            rows_with_problems: 0,
            rows,
        };
        report.recount();
        report
    }

    /// Refresh the counters after rows changed.
    pub fn recount(&mut self) {
        self.total_rows = self.rows.len();
        self.convertible_rows = self.rows.iter().filter(|r| r.convertible).count();
        self.rows_with_problems = self.rows.iter().filter(|r| !r.is_valid()).count();
    }

    pub fn is_clean(&self) -> bool {
        self.rows_with_problems == 0
    }

    /// Rows that carry at least one code.
    pub fn problems(&self) -> impl Iterator<Item = &RowDiagnostic> {
        self.rows.iter().filter(|r| !r.is_valid())
    }

    /// Number of rows carrying `code`.
    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.rows.iter().filter(|r| r.has(code)).count()
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json()?;
        write_file(path, &json)?;
        Ok(())
    }
}

/// Validate already-read rows.
pub fn validate_rows(rows: &[RawRow]) -> ValidationReport {
    let mut diagnostics: Vec<RowDiagnostic> = rows.iter().map(inspect_row).collect();
    mark_duplicates(&mut diagnostics);
    ValidationReport::from_rows(diagnostics, None)
}

/// Read and validate a CSV file.
pub fn validate_file<P: AsRef<Path>>(path: P, options: &LoaderOptions) -> LoaderResult<ValidationReport> {
    let path = path.as_ref();
    let rows = load_raw_rows(path, options)?;
    let mut report = validate_rows(&rows);
    report.source = Some(path.to_path_buf());
    Ok(report)
}

/// Flag convertible rows whose `document type/PID` was already produced by
/// an earlier convertible row.
///
/// Matching is case-insensitive because the Apache rules use `NC`.
fn mark_duplicates(rows: &mut [RowDiagnostic]) {
    let mut seen: HashMap<String, u64> = HashMap::new();
    for row in rows.iter_mut().filter(|row| row.convertible) {
        let key = format!("{}/{}", row.document_type, row.pid).to_uppercase();
        match seen.get(&key) {
            Some(&first) => {
                row.codes.push(DiagnosticCode::Duplicate);
                row.duplicate_of = Some(first);
            }
            None => {
                seen.insert(key, row.line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn report(csv: &str) -> ValidationReport {
        let rows = crate::parser::read_raw_rows(csv.as_bytes(), &LoaderOptions::default()).unwrap();
        validate_rows(&rows)
    }

    #[test]
    fn test_clean_file() {
        let r = report("PID,document type,URL\n123,book,http://example.com/b\n");
        assert!(r.is_clean());
        assert_eq!(r.total_rows, 1);
        assert_eq!(r.convertible_rows, 1);
    }

    #[test]
    fn test_sample_file_codes() {
        let r = report(
            "PID,document type,URL\n\
             123,book,http://example.com/book123\n\
             ,ignored,http://x\n\
             456,,http://y\n",
        );
        assert_eq!(r.total_rows, 3);
        assert_eq!(r.convertible_rows, 1);
        assert_eq!(r.rows_with_problems, 2);
        assert_eq!(r.rows[1].codes, vec![DiagnosticCode::InvalidPid]);
        assert_eq!(r.rows[2].codes, vec![DiagnosticCode::MissingDocumentType]);
        assert!(!r.rows[2].convertible);
    }

    #[test]
    fn test_invalid_characters() {
        let r = report("PID,document type,URL\na b,bo/ok,https://x.org\n");
        let row = &r.rows[0];
        assert!(row.has(DiagnosticCode::InvalidPid));
        assert!(row.has(DiagnosticCode::InvalidDocumentType));
        assert!(!row.has(DiagnosticCode::InvalidUrl));
        assert!(row.convertible);
    }

    #[test]
    fn test_invalid_url() {
        let r = report("PID,document type,URL\n1,t,ftp://x.org\n2,t,example.com\n3,t,\n");
        assert_eq!(r.count(DiagnosticCode::InvalidUrl), 3);
    }

    #[test]
    fn test_enabled_values() {
        let r = report("PID,document type,URL,enabled\n1,t,http://a,1\n2,t,http://b,0\n3,t,http://c,yes\n");
        assert_eq!(r.count(DiagnosticCode::InvalidEnabled), 1);
        assert!(r.rows[2].has(DiagnosticCode::InvalidEnabled));
    }

    #[test]
    fn test_duplicates_case_insensitive() {
        let r = report("PID,document type,URL\nabc,Book,http://a\nx,t,http://b\nABC,book,http://c\n");
        let dup = &r.rows[2];
        assert!(dup.has(DiagnosticCode::Duplicate));
        assert_eq!(dup.duplicate_of, Some(2));
        assert!(!r.rows[0].has(DiagnosticCode::Duplicate));
        assert_eq!(dup.code_list(), "E07");
    }

    #[test]
    fn test_dropped_rows_are_not_duplicate_sources() {
        let r = report("PID,document type,URL\n1,t,\n1,t,http://ok\n1,T,http://again\n");
        assert!(!r.rows[0].convertible);
        assert!(!r.rows[0].has(DiagnosticCode::Duplicate));

        let kept = &r.rows[1];
        assert!(kept.convertible);
        assert!(!kept.has(DiagnosticCode::Duplicate));
        assert_eq!(kept.duplicate_of, None);

        assert_eq!(r.rows[2].duplicate_of, Some(3));
    }

    #[test]
    fn test_report_json() {
        let r = report("PID,document type,URL\n,t,nope\n");
        let value: serde_json::Value = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(value["totalRows"], 1);
        assert_eq!(value["rowsWithProblems"], 1);
        assert_eq!(value["rows"][0]["codes"][0], "E01");
        assert_eq!(value["rows"][0]["codes"][1], "E04");
        assert!(value["rows"][0].get("urlReachable").is_none());
    }

    #[test]
    fn test_validate_file_and_save() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pids.csv");
        std::fs::write(&input, "PID,document type,URL\n1,t,http://a\n1,t,http://b\n").unwrap();

        let r = validate_file(&input, &LoaderOptions::default()).unwrap();
        assert_eq!(r.source.as_deref(), Some(input.as_path()));
        assert_eq!(r.rows_with_problems, 1);

        let out = dir.path().join("report.json");
        r.save_json(&out).unwrap();
        assert!(std::fs::read_to_string(out).unwrap().contains("\"E07\""));
    }

    #[test]
    fn test_is_web_url() {
        assert!(is_web_url("http://example.com/book123"));
        assert!(is_web_url("https://example.com"));
        assert!(!is_web_url("mailto:someone@example.com"));
        assert!(!is_web_url("/relative/path"));
    }
}
