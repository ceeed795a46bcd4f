//! Report generation
//!
//! Serializes analysis findings to a JSON report with a run timestamp and
//! summary counts.

use crate::analyze::{DocumentationIssue, IssueKind};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// RFC 3339 timestamp of report generation
    pub timestamp: String,
    /// All issues found, ordered by file path and line
    pub issues: Vec<DocumentationIssue>,
    /// Aggregate counts
    pub summary: Summary,
}

/// Aggregate issue counts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_issues: usize,
    pub missing_docs: usize,
    pub inconsistent_docs: usize,
    pub skipped_files: usize,
}

impl Summary {
    fn from_issues(issues: &[DocumentationIssue], skipped_files: usize) -> Self {
        let missing = issues
            .iter()
            .filter(|i| i.issue_type == IssueKind::Missing)
            .count();
        let inconsistent = issues
            .iter()
            .filter(|i| i.issue_type == IssueKind::Inconsistent)
            .count();

        Self {
            total_issues: issues.len(),
            missing_docs: missing,
            inconsistent_docs: inconsistent,
            skipped_files,
        }
    }
}

/// Build a report from the given issues and write it to `output_path`
/// as pretty-printed JSON, replacing any existing file
pub fn generate_report(
    issues: &[DocumentationIssue],
    skipped_files: usize,
    output_path: &Path,
) -> Result<AnalysisReport> {
    let report = AnalysisReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        issues: issues.to_vec(),
        summary: Summary::from_issues(issues, skipped_files),
    };

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output_path, json)?;

    info!(path = %output_path.display(), issues = report.summary.total_issues, "report written");

    Ok(report)
}
