//! Analysis orchestration
//!
//! Walks a codebase, parses each supported file, extracts documentable
//! elements, and classifies documentation issues:
//! - `missing`: a public element with no associated doc comment
//! - `inconsistent`: documentation whose similarity to the code falls
//!   below the configured threshold

mod config;

pub use config::{AnalyzerConfig, EmbeddingConfig};

use crate::doccomment::suggestion_template;
use crate::error::{AnalyzeError, Result};
use crate::extract::{CodeElement, ElementExtractor};
use crate::parse::ParserRegistry;
use crate::score::SimilarityScorer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Kind of documentation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// No documentation is associated with the element
    Missing,
    /// Documentation exists but does not match the code
    Inconsistent,
    /// Documentation refers to a prior revision of the code
    Outdated,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::Missing => write!(f, "missing"),
            IssueKind::Inconsistent => write!(f, "inconsistent"),
            IssueKind::Outdated => write!(f, "outdated"),
        }
    }
}

/// A documentation issue found during analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationIssue {
    /// The element the issue applies to
    pub element: CodeElement,
    /// Issue classification
    pub issue_type: IssueKind,
    /// Confidence in the finding (0.0 - 1.0)
    pub confidence: f64,
    /// Suggested documentation skeleton
    pub suggestion: String,
}

/// Cancellation handle shared between the analyzer and its caller
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation of the in-flight analysis
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Codebase analyzer.
///
/// Read-only after construction apart from the skipped-file counter;
/// files are dispatched to a bounded worker pool and their findings
/// accumulated in dispatch order.
pub struct Analyzer {
    config: AnalyzerConfig,
    registry: Arc<ParserRegistry>,
    scorer: Arc<SimilarityScorer>,
    skipped: AtomicUsize,
    cancel: CancelHandle,
}

impl Analyzer {
    /// Create an analyzer with the given configuration and scorer
    pub fn new(config: AnalyzerConfig, scorer: Arc<SimilarityScorer>) -> Self {
        Self {
            config,
            registry: Arc::new(ParserRegistry::with_default_languages()),
            scorer,
            skipped: AtomicUsize::new(0),
            cancel: CancelHandle::default(),
        }
    }

    /// Handle for cancelling an in-flight run
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Number of files skipped during the last run
    pub fn skipped_files(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Analyze all supported files under `root` and return the issues
    /// found, ordered by file path and then by line.
    ///
    /// Unreadable and unparseable files are skipped with a warning;
    /// only embedding model initialization failure aborts the run.
    pub async fn analyze_codebase(&self, root: &Path) -> Result<Vec<DocumentationIssue>> {
        self.scorer.ready().await?;
        self.skipped.store(0, Ordering::SeqCst);

        let files = self.collect_files(root)?;
        info!(count = files.len(), "analyzing files");

        let workers = self.config.worker_count();
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks: JoinSet<(PathBuf, Result<Vec<DocumentationIssue>>)> = JoinSet::new();

        for path in files {
            if self.cancel.is_cancelled() {
                info!("analysis cancelled");
                break;
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AnalyzeError::Config(format!("worker pool closed: {}", e)))?;

            let registry = Arc::clone(&self.registry);
            let scorer = Arc::clone(&self.scorer);
            let max_gap = self.config.max_comment_gap;
            let threshold = self.config.min_quality_score;

            tasks.spawn(async move {
                let _permit = permit;
                let result =
                    analyze_file(&path, registry, scorer, max_gap, threshold).await;
                (path, result)
            });
        }

        let mut issues = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(batch))) => issues.extend(batch),
                Ok((path, Err(e))) => {
                    if !e.is_per_file() {
                        return Err(e);
                    }
                    warn!(path = %path.display(), error = %e, "skipping file");
                    self.skipped.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => {
                    warn!(error = %e, "worker task failed");
                    self.skipped.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        issues.sort_by(|a, b| {
            a.element
                .file_path
                .cmp(&b.element.file_path)
                .then(a.element.span.start_line.cmp(&b.element.span.start_line))
        });

        info!(
            issues = issues.len(),
            skipped = self.skipped_files(),
            "analysis complete"
        );

        Ok(issues)
    }

    /// Collect analyzable files under `root`, honoring the configured
    /// extensions and ignore patterns, in lexical path order
    fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let ignore: Vec<glob::Pattern> = self
            .config
            .ignore_patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(pattern = %p, error = %e, "invalid ignore pattern");
                    None
                }
            })
            .collect();

        let mut files = Vec::new();

        for entry in walkdir::WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            let relative_str = relative.to_string_lossy();

            if ignore.iter().any(|p| p.matches(&relative_str)) {
                debug!(path = %relative_str, "ignored");
                continue;
            }

            let supported = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| self.config.matches_extension(e) && self.registry.supports(e))
                .unwrap_or(false);

            if supported {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Parse one file, extract its elements, and classify issues
async fn analyze_file(
    path: &Path,
    registry: Arc<ParserRegistry>,
    scorer: Arc<SimilarityScorer>,
    max_comment_gap: usize,
    threshold: f64,
) -> Result<Vec<DocumentationIssue>> {
    let content = tokio::fs::read_to_string(path).await?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let parser = match registry.get(extension) {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };

    let parsed = parser.parse(path, &content)?;
    let dialect = parsed.language.dialect();

    let extractor = ElementExtractor::new(max_comment_gap);
    let elements = extractor.extract(&parsed, &content, &path.to_string_lossy());

    debug!(path = %path.display(), elements = elements.len(), "extracted elements");

    let mut issues = Vec::new();

    for element in elements {
        match &element.doc_comment {
            None => {
                let suggestion = suggestion_template(&element, dialect);
                issues.push(DocumentationIssue {
                    element,
                    issue_type: IssueKind::Missing,
                    confidence: 1.0,
                    suggestion,
                });
            }
            Some(doc) => {
                let similarity = scorer.similarity(&element.source_snippet, doc).await?;
                if similarity < threshold {
                    let suggestion = suggestion_template(&element, dialect);
                    issues.push(DocumentationIssue {
                        element,
                        issue_type: IssueKind::Inconsistent,
                        confidence: (1.0 - similarity).clamp(0.0, 1.0),
                        suggestion,
                    });
                }
            }
        }
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{EmbeddingProvider, HashEmbedding};
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    fn test_analyzer() -> Analyzer {
        let scorer = Arc::new(SimilarityScorer::new(Arc::new(HashEmbedding::new(256))));
        Analyzer::new(AnalyzerConfig::default(), scorer)
    }

    /// Provider that initializes fine but fails every embedding call
    struct FailingEmbedding;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedding {
        async fn ready(&self) -> Result<()> {
            Ok(())
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(AnalyzeError::Embedding("backend went away".to_string()))
        }

        fn dimension(&self) -> usize {
            8
        }
    }

    #[tokio::test]
    async fn test_undocumented_function_reported_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("math.py"),
            "def add(a, b):\n    return a + b\n",
        )
        .unwrap();

        let analyzer = test_analyzer();
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueKind::Missing);
        assert_eq!(issues[0].element.name, "add");
        assert_eq!(issues[0].confidence, 1.0);
        assert!(issues[0].suggestion.contains("Args:"));
        assert_eq!(analyzer.skipped_files(), 0);
    }

    #[tokio::test]
    async fn test_unrelated_docstring_reported_inconsistent() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("math.py"),
            concat!(
                "def add(a, b):\n",
                "    \"\"\"Connects to a remote database and fetches all user rows.\"\"\"\n",
                "    return a + b\n",
            ),
        )
        .unwrap();

        let analyzer = test_analyzer();
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueKind::Inconsistent);
        assert!(issues[0].confidence > 0.0 && issues[0].confidence <= 1.0);
    }

    #[tokio::test]
    async fn test_overlapping_docstring_passes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("math.py"),
            concat!(
                "def add(a, b):\n",
                "    \"\"\"Return a + b, the add of a and b.\"\"\"\n",
                "    return a + b\n",
            ),
        )
        .unwrap();

        let analyzer = test_analyzer();
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[tokio::test]
    async fn test_ignore_patterns_respected() {
        let dir = TempDir::new().unwrap();
        let vendored = dir.path().join("node_modules").join("pkg");
        fs::create_dir_all(&vendored).unwrap();
        fs::write(vendored.join("index.js"), "function f(x) { return x; }\n").unwrap();
        fs::write(
            dir.path().join("app.js"),
            "function g(y) { return y; }\n",
        )
        .unwrap();

        let analyzer = test_analyzer();
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element.name, "g");
    }

    #[tokio::test]
    async fn test_unsupported_extensions_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "not source code").unwrap();
        fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();

        let analyzer = test_analyzer();
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();
        assert!(issues.is_empty());
        assert_eq!(analyzer.skipped_files(), 0);
    }

    #[tokio::test]
    async fn test_syntax_error_skips_file_and_counts_it() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.py"), "def broken(:\n").unwrap();
        fs::write(
            dir.path().join("ok.py"),
            "def fine(x):\n    return x\n",
        )
        .unwrap();

        let analyzer = test_analyzer();
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element.name, "fine");
        assert_eq!(analyzer.skipped_files(), 1);
    }

    #[tokio::test]
    async fn test_results_stable_across_runs() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.py"),
            "def first(x):\n    return x\n\ndef second(y):\n    return y\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.js"), "function third(z) { return z; }\n").unwrap();

        let analyzer = test_analyzer();
        let first = analyzer.analyze_codebase(dir.path()).await.unwrap();
        let second = analyzer.analyze_codebase(dir.path()).await.unwrap();

        let names = |issues: &[DocumentationIssue]| {
            issues
                .iter()
                .map(|i| i.element.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));
        assert_eq!(names(&first), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_embedding_failure_skips_file_without_aborting() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("documented.py"),
            concat!(
                "def add(a, b):\n",
                "    \"\"\"Return a + b.\"\"\"\n",
                "    return a + b\n",
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("plain.py"),
            "def plain(x):\n    return x\n",
        )
        .unwrap();

        let scorer = Arc::new(SimilarityScorer::new(Arc::new(FailingEmbedding)));
        let analyzer = Analyzer::new(AnalyzerConfig::default(), scorer);

        // Scoring the documented file fails per call; the run still
        // completes and reports the undocumented one.
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element.name, "plain");
        assert_eq!(issues[0].issue_type, IssueKind::Missing);
        assert_eq!(analyzer.skipped_files(), 1);
    }

    #[tokio::test]
    async fn test_jsx_analyzed_under_default_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("App.jsx"),
            "function render(props) { return props; }\n",
        )
        .unwrap();

        let analyzer = test_analyzer();
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element.name, "render");
        assert_eq!(issues[0].issue_type, IssueKind::Missing);
    }

    #[tokio::test]
    async fn test_cancel_stops_dispatch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "def a(x):\n    return x\n").unwrap();

        let analyzer = test_analyzer();
        analyzer.cancel_handle().cancel();
        let issues = analyzer.analyze_codebase(dir.path()).await.unwrap();
        assert!(issues.is_empty());
    }
}
