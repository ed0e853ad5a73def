//! End-to-end conversion: load CSV, render rules, write the rule file.
//!
//! # Example
//!
//! ```rust,no_run
//! use culturize::{convert_csv, ConvertOptions, Target};
//! use std::path::Path;
//!
//! let options = ConvertOptions::new(Target::Nginx).with_dest("/etc/nginx/conf.d");
//! let result = convert_csv(Path::new("pids.csv"), &options)?;
//! println!("{} rules written to {}", result.rule_count, result.path.display());
//! # Ok::<(), culturize::ConvertError>(())
//! ```

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertResult, WriteError};
use crate::models::Target;
use crate::parser::{load_records_with, LoaderOptions};
use crate::render::{render, RenderOptions};

/// Options for a full conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub target: Target,
    /// Existing directory that receives the rule file.
    pub dest: PathBuf,
    pub loader: LoaderOptions,
    pub render: RenderOptions,
}

impl ConvertOptions {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            dest: PathBuf::from("."),
            loader: LoaderOptions::default(),
            render: RenderOptions::default(),
        }
    }

    pub fn with_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = dest.into();
        self
    }

    pub fn with_subdir(mut self, subdir: Option<String>) -> Self {
        self.render.subdir = subdir;
        self
    }

    pub fn with_loader(mut self, loader: LoaderOptions) -> Self {
        self.loader = loader;
        self
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub target: Target,
    /// Full path of the written file.
    pub path: PathBuf,
    /// Number of rules in the file.
    pub rule_count: usize,
}

/// Load, render and write in one pass.
///
/// Nothing is written if loading fails.
pub fn convert_csv(input: &Path, options: &ConvertOptions) -> ConvertResult<ConversionResult> {
    let records = load_records_with(input, &options.loader)?;
    let text = render(&records, options.target, &options.render);
    let path = write_rules(&options.dest, options.target, &text)?;

    Ok(ConversionResult {
        target: options.target,
        path,
        rule_count: records.len(),
    })
}

/// Write rule text to the target's fixed file name inside `dir`.
///
/// The directory must already exist.
pub fn write_rules(dir: &Path, target: Target, text: &str) -> Result<PathBuf, WriteError> {
    let path = dir.join(target.file_name());
    write_file(&path, text)?;
    Ok(path)
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), WriteError> {
    fs::write(path, content).map_err(|source| WriteError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConvertError, LoaderError};
    use tempfile::tempdir;

    const SAMPLE: &str = "PID,document type,URL\n\
                          123,book,http://example.com/book123\n\
                          ,ignored,http://x\n\
                          456,,http://y\n";

    #[test]
    fn test_convert_nginx() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pids.csv");
        fs::write(&input, SAMPLE).unwrap();

        let options = ConvertOptions::new(Target::Nginx).with_dest(dir.path());
        let result = convert_csv(&input, &options).unwrap();

        assert_eq!(result.path, dir.path().join("nginx_redirect.conf"));
        assert_eq!(result.rule_count, 1);
        assert_eq!(
            fs::read_to_string(&result.path).unwrap(),
            "rewrite /book/123$ http://example.com/book123 redirect ;\n"
        );
    }

    #[test]
    fn test_convert_apache() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pids.csv");
        fs::write(&input, SAMPLE).unwrap();

        let options = ConvertOptions::new(Target::Apache).with_dest(dir.path());
        let result = convert_csv(&input, &options).unwrap();

        assert_eq!(result.path, dir.path().join(".htaccess"));
        assert_eq!(
            fs::read_to_string(&result.path).unwrap(),
            "Options +FollowSymLinks\nRewriteEngine on\n\nRewriteRule ^book/123$ http://example.com/book123 [R=302,NC,NE,L]\n"
        );
    }

    #[test]
    fn test_convert_with_subdir() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pids.csv");
        fs::write(&input, SAMPLE).unwrap();

        let options = ConvertOptions::new(Target::Nginx)
            .with_dest(dir.path())
            .with_subdir(Some("museum".into()));
        let result = convert_csv(&input, &options).unwrap();
        assert_eq!(
            fs::read_to_string(&result.path).unwrap(),
            "rewrite /museum/book/123$ http://example.com/book123 redirect ;\n"
        );
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let options = ConvertOptions::new(Target::Nginx).with_dest(dir.path());

        let result = convert_csv(&dir.path().join("missing.csv"), &options);
        assert!(matches!(result, Err(ConvertError::Loader(LoaderError::Open { .. }))));
        assert!(!dir.path().join("nginx_redirect.conf").exists());
    }

    #[test]
    fn test_missing_dest_dir_is_write_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pids.csv");
        fs::write(&input, SAMPLE).unwrap();

        let options = ConvertOptions::new(Target::Apache).with_dest(dir.path().join("absent"));
        let result = convert_csv(&input, &options);
        assert!(matches!(result, Err(ConvertError::Write(_))));
        assert!(!dir.path().join("absent").exists());
    }

    #[test]
    fn test_write_rules_overwrites() {
        let dir = tempdir().unwrap();
        write_rules(dir.path(), Target::Nginx, "old\n").unwrap();
        let path = write_rules(dir.path(), Target::Nginx, "new\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "new\n");
    }
}
