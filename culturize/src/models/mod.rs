//! Domain models for the redirect conversion pipeline.
//!
//! - [`RedirectRecord`] - One validated redirect (PID, document type, URL)
//! - [`Target`] - The webserver the rules are generated for

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{APACHE_CONF_FILE, NGINX_CONF_FILE};
use crate::error::TargetError;

// =============================================================================
// Redirect Record
// =============================================================================

/// A single persistent-identifier redirect.
///
/// Built by the loader only when `PID`, `document type` and `URL` are all
/// non-empty after trimming. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRecord {
    persistent_id: String,
    document_type: String,
    target_url: String,
}

impl RedirectRecord {
    /// Create a record from already trimmed values.
    ///
    /// Returns `None` if the identifier or the URL is empty. The document
    /// type may be empty here; the CSV loader is stricter.
    pub fn new(
        persistent_id: impl Into<String>,
        document_type: impl Into<String>,
        target_url: impl Into<String>,
    ) -> Option<Self> {
        let persistent_id = persistent_id.into();
        let target_url = target_url.into();
        if persistent_id.is_empty() || target_url.is_empty() {
            return None;
        }
        Some(Self {
            persistent_id,
            document_type: document_type.into(),
            target_url,
        })
    }

    pub fn persistent_id(&self) -> &str {
        &self.persistent_id
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// `documentType/persistentId`, or just the identifier when there is
    /// no document type.
    pub fn redirect_path(&self) -> String {
        if self.document_type.is_empty() {
            self.persistent_id.clone()
        } else {
            format!("{}/{}", self.document_type, self.persistent_id)
        }
    }
}

// =============================================================================
// Target
// =============================================================================

/// Webserver the rule file is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Nginx,
    Apache,
}

impl Target {
    /// All supported targets.
    pub const ALL: [Target; 2] = [Target::Apache, Target::Nginx];

    /// Fixed name of the generated file.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Nginx => NGINX_CONF_FILE,
            Self::Apache => APACHE_CONF_FILE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nginx => "nginx",
            Self::Apache => "apache",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nginx" => Ok(Self::Nginx),
            "apache" => Ok(Self::Apache),
            _ => Err(TargetError(s.to_string())),
        }
    }
}
