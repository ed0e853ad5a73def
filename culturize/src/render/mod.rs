//! Rewrite-rule rendering for nginx and Apache.
//!
//! # Grammar
//!
//! ```text
//! nginx:   rewrite /[<subdir>/][<documentType>/]<persistentId>$ <targetUrl> redirect ;
//! apache:  Options +FollowSymLinks
//!          RewriteEngine on
//!
//!          RewriteRule ^[<documentType>/]<persistentId>$ <targetUrl> [R=302,NC,NE,L]
//! ```
//!
//! Every rule line ends with `\n`. Records keep their input order; nothing is
//! sorted, deduplicated or escaped, so the webserver's first-match-wins rule
//! decides between duplicates.

use crate::config::{APACHE_PREAMBLE, APACHE_RULE_FLAGS};
use crate::models::{RedirectRecord, Target};

/// Rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Leading path segment for nginx rules. Ignored for Apache.
    pub subdir: Option<String>,
}

impl RenderOptions {
    pub fn with_subdir(subdir: impl Into<String>) -> Self {
        Self {
            subdir: Some(subdir.into()),
        }
    }

    /// The subdirectory without surrounding slashes, if any is left.
    fn normalized_subdir(&self) -> Option<&str> {
        self.subdir
            .as_deref()
            .map(|s| s.trim().trim_matches('/'))
            .filter(|s| !s.is_empty())
    }
}

/// Render the complete rule file for `target`.
pub fn render(records: &[RedirectRecord], target: Target, options: &RenderOptions) -> String {
    match target {
        Target::Nginx => render_nginx(records, options),
        Target::Apache => render_apache(records),
    }
}

/// Render nginx `rewrite` directives.
pub fn render_nginx(records: &[RedirectRecord], options: &RenderOptions) -> String {
    let subdir = options.normalized_subdir();
    let mut out = String::new();
    for record in records {
        out.push_str(&nginx_rule(record, subdir));
        out.push('\n');
    }
    out
}

/// Render an `.htaccess` file: preamble, then one `RewriteRule` per record.
pub fn render_apache(records: &[RedirectRecord]) -> String {
    let mut out = String::from(APACHE_PREAMBLE);
    for record in records {
        out.push_str(&apache_rule(record));
        out.push('\n');
    }
    out
}

/// A single nginx rule, without line terminator.
pub fn nginx_rule(record: &RedirectRecord, subdir: Option<&str>) -> String {
    let path = match subdir {
        Some(subdir) => format!("{}/{}", subdir, record.redirect_path()),
        None => record.redirect_path(),
    };
    format!("rewrite /{}$ {} redirect ;", path, record.target_url())
}

/// A single Apache rule, without line terminator.
pub fn apache_rule(record: &RedirectRecord) -> String {
    format!(
        "RewriteRule ^{}$ {} {}",
        record.redirect_path(),
        record.target_url(),
        APACHE_RULE_FLAGS
    )
}
