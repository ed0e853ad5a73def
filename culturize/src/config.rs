//! Configuration constants and environment-driven defaults.
//!
//! The binary loads a `.env` file (if present) before parsing arguments, so
//! every `CULTURIZE_*` variable below can live there as well.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// CSV columns
// =============================================================================

/// The identifier of the object.
pub const COL_PID: &str = "PID";

/// The document type path segment.
pub const COL_DOCTYPE: &str = "document type";

/// The URL the identifier resolves to.
pub const COL_URL: &str = "URL";

/// Optional 0/1 column that switches a redirect on or off.
pub const COL_ENABLED: &str = "enabled";

// =============================================================================
// Output
// =============================================================================

/// File written for nginx targets.
pub const NGINX_CONF_FILE: &str = "nginx_redirect.conf";

/// File written for Apache targets.
pub const APACHE_CONF_FILE: &str = ".htaccess";

/// Lines that open every `.htaccess` file, blank separator line included.
pub const APACHE_PREAMBLE: &str = "Options +FollowSymLinks\nRewriteEngine on\n\n";

/// Flags appended to every Apache `RewriteRule`.
pub const APACHE_RULE_FLAGS: &str = "[R=302,NC,NE,L]";

// =============================================================================
// Environment
// =============================================================================

pub const ENV_DEST: &str = "CULTURIZE_DEST";
pub const ENV_SUBDIR: &str = "CULTURIZE_SUBDIR";
pub const ENV_DELIMITER: &str = "CULTURIZE_DELIMITER";
pub const ENV_URL_TIMEOUT_MS: &str = "CULTURIZE_URL_TIMEOUT_MS";

/// Default timeout for a single URL reachability check.
pub const DEFAULT_URL_TIMEOUT_MS: u64 = 2000;

/// Resolved settings for a run.
///
/// Values come from explicit arguments first, then from the environment,
/// then from built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory that receives the rule file.
    pub dest: PathBuf,
    /// Leading path segment for nginx match paths.
    pub subdir: Option<String>,
    /// Field delimiter of the input CSV.
    pub delimiter: u8,
    /// Per-request timeout for URL checks.
    pub url_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dest: PathBuf::from("."),
            subdir: None,
            delimiter: b',',
            url_timeout: Duration::from_millis(DEFAULT_URL_TIMEOUT_MS),
        }
    }
}

impl Settings {
    /// Build settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            dest: non_empty(ENV_DEST).map(PathBuf::from).unwrap_or(defaults.dest),
            subdir: non_empty(ENV_SUBDIR),
            delimiter: non_empty(ENV_DELIMITER)
                .and_then(|v| parse_delimiter(&v).ok())
                .unwrap_or(defaults.delimiter),
            url_timeout: non_empty(ENV_URL_TIMEOUT_MS)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.url_timeout),
        }
    }

    /// Override with explicitly given values.
    pub fn with_overrides(
        mut self,
        dest: Option<PathBuf>,
        subdir: Option<String>,
        delimiter: Option<u8>,
    ) -> Self {
        if let Some(dest) = dest {
            self.dest = dest;
        }
        if subdir.is_some() {
            self.subdir = subdir;
        }
        if let Some(delimiter) = delimiter {
            self.delimiter = delimiter;
        }
        self
    }
}

/// Parse a single-byte delimiter. `\t` and `tab` mean a tab.
pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" | "TAB" | "\t" => Ok(b'\t'),
        _ => {
            let bytes = s.as_bytes();
            if bytes.len() == 1 {
                Ok(bytes[0])
            } else {
                Err(format!("Delimiter must be a single ASCII character, got '{}'", s))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.dest, PathBuf::from("."));
        assert_eq!(settings.delimiter, b',');
    }

    #[test]
    fn test_env_values() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_DEST, "/srv/www"),
            (ENV_SUBDIR, "collection"),
            (ENV_DELIMITER, ";"),
            (ENV_URL_TIMEOUT_MS, "500"),
        ]));
        assert_eq!(settings.dest, PathBuf::from("/srv/www"));
        assert_eq!(settings.subdir.as_deref(), Some("collection"));
        assert_eq!(settings.delimiter, b';');
        assert_eq!(settings.url_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_blank_and_invalid_env_fall_back() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_SUBDIR, "  "),
            (ENV_DELIMITER, ";;"),
            (ENV_URL_TIMEOUT_MS, "soon"),
        ]));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::from_lookup(lookup(&[(ENV_DEST, "/srv/www")])).with_overrides(
            Some(PathBuf::from("out")),
            Some("sub".into()),
            None,
        );
        assert_eq!(settings.dest, PathBuf::from("out"));
        assert_eq!(settings.subdir.as_deref(), Some("sub"));
        assert_eq!(settings.delimiter, b',');
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(b','));
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
