//! Error types for the culturize conversion pipeline.
//!
//! - [`LoaderError`] - CSV input could not be opened or parsed
//! - [`WriteError`] - Rule file could not be written
//! - [`TargetError`] - Unknown webserver target name
//! - [`CheckError`] - URL reachability checker could not start
//! - [`ReportError`] - Validation report could not be saved
//! - [`ConvertError`] - Top-level orchestration errors
//!
//! Rows with missing fields are never errors: the loader drops them.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Loader Errors
// =============================================================================

/// Errors while reading the redirect CSV.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The file could not be opened.
    #[error("Cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line is not valid UTF-8.
    #[error("Invalid UTF-8 on line {line}")]
    Utf8 { line: u64 },

    /// Read failure while scanning records.
    #[error("Invalid CSV: {0}")]
    Read(csv::Error),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::Utf8 { pos, .. } = err.kind() {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
            return LoaderError::Utf8 { line };
        }
        LoaderError::Read(err)
    }
}

// =============================================================================
// Write Errors
// =============================================================================

/// The rule file could not be written to its destination.
#[derive(Debug, Error)]
#[error("Cannot write '{}': {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

// =============================================================================
// Target Errors
// =============================================================================

/// Unknown webserver name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown target '{0}' (expected 'apache' or 'nginx')")]
pub struct TargetError(pub String);

// =============================================================================
// URL Check Errors
// =============================================================================

/// The URL checker could not be set up.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Async runtime construction failed.
    #[error("Cannot start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// HTTP client construction failed.
    #[error("Cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// =============================================================================
// Report Errors
// =============================================================================

/// Errors while saving a validation report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("Report JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the report file failed.
    #[error(transparent)]
    Write(#[from] WriteError),
}

// =============================================================================
// Convert Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::pipeline::convert_csv`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Loading the CSV failed.
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    /// Writing the rule file failed.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let loader_err = LoaderError::Open {
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let convert_err: ConvertError = loader_err.into();
        assert!(convert_err.to_string().contains("missing.csv"));

        let write_err = WriteError {
            path: PathBuf::from("/nope/.htaccess"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let convert_err: ConvertError = write_err.into();
        assert!(convert_err.to_string().contains(".htaccess"));
    }

    #[test]
    fn test_target_error_format() {
        let err = TargetError("iis".into());
        let msg = err.to_string();
        assert!(msg.contains("iis"));
        assert!(msg.contains("nginx"));
    }

    #[test]
    fn test_utf8_error_maps_to_line() {
        let bytes: &[u8] = b"PID,document type,URL\n1,book,\xff\xfe\n";
        let mut reader = csv::Reader::from_reader(bytes);
        let err = reader
            .records()
            .find_map(|r| r.err())
            .expect("invalid utf-8 must fail");
        match LoaderError::from(err) {
            LoaderError::Utf8 { line } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
