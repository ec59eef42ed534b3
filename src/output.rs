use serde::Serialize;
use std::time::Duration;

use crate::core::result::{DispatchReport, FetchResult};
use crate::core::stats::StatsSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// `0.42s    1270 https://example.com`, or the error in place of the size.
pub fn format_line(result: &FetchResult) -> String {
    let secs = result.elapsed().as_secs_f64();
    match result {
        FetchResult::Success { target, bytes, .. } => {
            format!("{:.2}s {:>7} {}", secs, bytes, target)
        }
        FetchResult::Failure { target, error, .. } => {
            format!("{:.2}s {:>7} {}: {}", secs, "error", target, error)
        }
    }
}

pub fn format_summary(elapsed: Duration) -> String {
    format!("{:.2}s elapsed", elapsed.as_secs_f64())
}

#[derive(Debug, Serialize)]
pub struct ResultRecord<'a> {
    pub index: usize,
    pub target: &'a str,
    pub ok: bool,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a FetchResult> for ResultRecord<'a> {
    fn from(result: &'a FetchResult) -> Self {
        Self {
            index: result.target().index(),
            target: result.target().url(),
            ok: result.is_success(),
            elapsed_ms: result.elapsed().as_secs_f64() * 1000.0,
            bytes: result.bytes(),
            error: result.error().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryRecord {
    pub elapsed_ms: f64,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_bytes: u64,
    pub stats: StatsSnapshot,
}

impl From<&DispatchReport> for SummaryRecord {
    fn from(report: &DispatchReport) -> Self {
        Self {
            elapsed_ms: report.elapsed().as_secs_f64() * 1000.0,
            total: report.len(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            total_bytes: report.total_bytes(),
            stats: *report.stats(),
        }
    }
}

pub fn render_result(
    result: &FetchResult,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(format_line(result)),
        OutputFormat::Json => serde_json::to_string(&ResultRecord::from(result)),
    }
}

pub fn render_summary(
    report: &DispatchReport,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(format_summary(report.elapsed())),
        OutputFormat::Json => serde_json::to_string(&SummaryRecord::from(report)),
    }
}
