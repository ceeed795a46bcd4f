//! Command implementations

use crate::analyze::{Analyzer, AnalyzerConfig, DocumentationIssue, IssueKind};
use crate::report::generate_report;
use crate::score::{EmbeddingProvider, HashEmbedding, HttpEmbedding, SimilarityScorer};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::{AnalyzeArgs, ConfigArgs, OutputFormat};

/// Analyze a codebase for documentation issues
pub async fn analyze(path: &Path, args: &AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let mut config = AnalyzerConfig::load_or_default(path)
        .context("failed to load configuration")?;

    if let Some(threshold) = args.threshold {
        config.min_quality_score = threshold;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(ref endpoint) = args.endpoint {
        config.embedding.endpoint = Some(endpoint.clone());
    }
    if let Some(ref model) = args.model {
        config.embedding.model = Some(model.clone());
    }
    config.validate().context("invalid configuration")?;

    let scorer = Arc::new(SimilarityScorer::new(build_provider(&config)));
    let analyzer = Analyzer::new(config, scorer);

    let issues = analyzer
        .analyze_codebase(path)
        .await
        .context("analysis failed")?;
    let skipped = analyzer.skipped_files();

    if let Some(ref report_path) = args.output {
        let report = generate_report(&issues, skipped, Path::new(report_path))?;
        println!(
            "Report written to {} ({} issues)",
            report_path, report.summary.total_issues
        );
    }

    match format {
        OutputFormat::Json => print_issues_json(&issues)?,
        OutputFormat::Text => print_issues_text(&issues, skipped),
    }

    Ok(())
}

/// Build the embedding provider from configuration.
///
/// An HTTP endpoint takes precedence; without one the deterministic
/// local provider is used.
fn build_provider(config: &AnalyzerConfig) -> Arc<dyn EmbeddingProvider> {
    match config.embedding.endpoint {
        Some(ref endpoint) => {
            let model = config
                .embedding
                .model
                .as_deref()
                .unwrap_or("nomic-embed-text");
            info!(endpoint = %endpoint, model = %model, "using HTTP embedding provider");
            Arc::new(HttpEmbedding::new(endpoint, model))
        }
        None => {
            info!(
                dimension = config.embedding.dimension,
                "using local embedding provider"
            );
            Arc::new(HashEmbedding::new(config.embedding.dimension))
        }
    }
}

/// Show or reset configuration
pub fn config_command(path: &Path, args: &ConfigArgs) -> Result<()> {
    if args.init || args.reset {
        let config = AnalyzerConfig::default();
        config.save(path)?;
        println!("✓ Wrote default configuration to {:?}", path.join("docdrift.toml"));
        return Ok(());
    }

    let config = AnalyzerConfig::load_or_default(path)?;

    println!("docdrift Configuration");
    println!("======================\n");

    println!("File extensions:");
    for ext in &config.file_extensions {
        println!("  - {}", ext);
    }

    println!("\nIgnore patterns:");
    for pattern in &config.ignore_patterns {
        println!("  - {}", pattern);
    }

    println!("\nSimilarity threshold: {}", config.min_quality_score);
    println!("Max comment gap: {}", config.max_comment_gap);
    println!("Workers: {}", config.worker_count());

    if let Some(ref endpoint) = config.embedding.endpoint {
        println!("\nEmbedding endpoint: {}", endpoint);
    }
    if let Some(ref model) = config.embedding.model {
        println!("Embedding model: {}", model);
    }

    Ok(())
}

/// Print issues as pretty JSON to stdout
pub fn print_issues_json(issues: &[DocumentationIssue]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(issues)?);
    Ok(())
}

/// Print issues as human-readable text
pub fn print_issues_text(issues: &[DocumentationIssue], skipped: usize) {
    if issues.is_empty() {
        println!("✓ No documentation issues found");
    } else {
        println!("Found {} documentation issue(s):\n", issues.len());

        for issue in issues {
            let marker = match issue.issue_type {
                IssueKind::Missing => "✗ missing",
                IssueKind::Inconsistent => "⚠ inconsistent",
                IssueKind::Outdated => "⚠ outdated",
            };

            println!(
                "{}  {} `{}` at {}:{} (confidence {:.2})",
                marker,
                issue.element.kind,
                issue.element.name,
                issue.element.file_path,
                issue.element.span.start_line,
                issue.confidence,
            );
        }
    }

    if skipped > 0 {
        println!("\n{} file(s) skipped due to read or parse errors", skipped);
    }
}
