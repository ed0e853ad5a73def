//! # culturize - Persistent URI redirects for nginx and Apache
//!
//! Converts a CSV file of persistent identifiers into webserver rewrite rules.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────────────┐
//! │   CSV File  │────▶│   Loader    │────▶│  Renderer   │────▶│ nginx_redirect.conf │
//! │ PID,doctype │     │ (drop rows) │     │ nginx/apache│     │   or .htaccess      │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use culturize::{load_records, render, RenderOptions, Target};
//!
//! let records = load_records("pids.csv")?;
//! let htaccess = render(&records, Target::Apache, &RenderOptions::default());
//! print!("{}", htaccess);
//! # Ok::<(), culturize::LoaderError>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Domain models (RedirectRecord, Target)
//! - [`parser`] - CSV loading
//! - [`render`] - Rule rendering
//! - [`pipeline`] - Load, render and write in one call
//! - [`validation`] - Row diagnostics and URL checks
//! - [`config`] - Constants and environment settings
//! - [`logs`] - Status logging

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Loading and rendering
pub mod parser;
pub mod render;
pub mod pipeline;

// Diagnostics
pub mod validation;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CheckError,
    ConvertError,
    LoaderError,
    ReportError,
    TargetError,
    WriteError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{RedirectRecord, Target};

// =============================================================================
// Re-exports - Loader
// =============================================================================

pub use parser::{
    load_raw_rows,
    load_records,
    load_records_with,
    read_raw_rows,
    read_records,
    LoaderOptions,
    RawRow,
};

// =============================================================================
// Re-exports - Renderer
// =============================================================================

pub use render::{render, render_apache, render_nginx, RenderOptions};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{convert_csv, write_rules, ConversionResult, ConvertOptions};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    check_urls,
    validate_file,
    validate_rows,
    DiagnosticCode,
    RowDiagnostic,
    ValidationReport,
};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::Settings;
