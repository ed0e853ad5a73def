//! URL reachability checks for a validation report.
//!
//! Each URL gets one HEAD request; anything other than `200` (including
//! timeouts and connection errors) marks the row with E06. Requests are sent
//! one after another on a current-thread runtime.

use std::time::Duration;

use super::{DiagnosticCode, ValidationReport};
use crate::error::CheckError;
use crate::logs::log_info;

/// Check every row with a well-formed URL. Returns the number of
/// unreachable URLs.
pub fn check_urls(report: &mut ValidationReport, timeout: Duration) -> Result<usize, CheckError> {
    let pending: Vec<usize> = report
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.url.is_empty() && !row.has(DiagnosticCode::InvalidUrl))
        .map(|(i, _)| i)
        .collect();

    if pending.is_empty() {
        return Ok(0);
    }

    log_info(format!("Checking {} URLs (timeout {}ms)...", pending.len(), timeout.as_millis()));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    let mut unreachable = 0;
    runtime.block_on(async {
        for i in pending {
            let row = &mut report.rows[i];
            let reachable = head_ok(&client, &row.url).await;
            row.url_reachable = Some(reachable);
            if !reachable {
                row.codes.push(DiagnosticCode::UnreachableUrl);
                unreachable += 1;
            }
        }
    });

    report.recount();
    Ok(unreachable)
}

async fn head_ok(client: &reqwest::Client, url: &str) -> bool {
    match client.head(url).send().await {
        Ok(response) => response.status() == reqwest::StatusCode::OK,
        Err(_) => false,
    }
}
