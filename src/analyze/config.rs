//! Analyzer configuration

use crate::error::{AnalyzeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a documentation analysis run.
///
/// Supplied by the surrounding application at startup and read-only from
/// then on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// File extensions to analyze
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Glob patterns for paths to skip
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Similarity threshold below which documentation is inconsistent
    /// (0.0 - 1.0)
    #[serde(default = "default_min_quality_score")]
    pub min_quality_score: f64,

    /// Maximum line gap between a doc comment and the declaration it
    /// documents
    #[serde(default = "default_max_comment_gap")]
    pub max_comment_gap: usize,

    /// Worker pool size; 0 means one worker per available core
    #[serde(default)]
    pub workers: usize,

    /// Embedding endpoint configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Embedding endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmbeddingConfig {
    /// API endpoint URL (e.g., http://localhost:11434 for Ollama); when
    /// absent the deterministic local embedding is used
    pub endpoint: Option<String>,

    /// Model name to use
    pub model: Option<String>,

    /// Embedding dimension for the local provider
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_file_extensions() -> Vec<String> {
    vec![
        "py".to_string(),
        "js".to_string(),
        "jsx".to_string(),
        "ts".to_string(),
    ]
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/target/**".to_string(),
        "**/.git/**".to_string(),
        "**/venv/**".to_string(),
        "**/__pycache__/**".to_string(),
        "**/dist/**".to_string(),
        "**/build/**".to_string(),
    ]
}

fn default_min_quality_score() -> f64 {
    0.7
}

fn default_max_comment_gap() -> usize {
    1
}

fn default_dimension() -> usize {
    256
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            file_extensions: default_file_extensions(),
            ignore_patterns: default_ignore_patterns(),
            min_quality_score: default_min_quality_score(),
            max_comment_gap: default_max_comment_gap(),
            workers: 0,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from `docdrift.toml` under the given root, or
    /// return defaults when the file does not exist
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join("docdrift.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: AnalyzerConfig = toml::from_str(&content).map_err(|e| {
                AnalyzeError::Config(format!("failed to parse {:?}: {}", config_path, e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `docdrift.toml` under the given root
    pub fn save(&self, root: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AnalyzeError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(root.join("docdrift.toml"), content)?;
        Ok(())
    }

    /// Reject out-of-range values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_quality_score) {
            return Err(AnalyzeError::Config(format!(
                "min_quality_score must be within [0, 1], got {}",
                self.min_quality_score
            )));
        }
        Ok(())
    }

    /// Effective worker pool size
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }

    /// Whether a file extension is configured for analysis
    pub fn matches_extension(&self, extension: &str) -> bool {
        self.file_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}
