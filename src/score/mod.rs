//! Semantic similarity scoring
//!
//! Encodes code snippets and documentation text into fixed-length vectors
//! via an embedding provider and compares them with cosine similarity. The
//! provider is constructed once by the process entry point and injected;
//! `ready()` gates the first scoring call.

mod embedding;

pub use embedding::{EmbeddingProvider, HashEmbedding, HttpEmbedding};

use crate::error::Result;
use std::sync::Arc;

/// Compute cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Scores code-to-documentation consistency via a shared embedding provider.
///
/// Read-only after construction and safe for concurrent use; clone the
/// surrounding `Arc` to share across workers.
pub struct SimilarityScorer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl SimilarityScorer {
    /// Create a scorer around an injected embedding provider
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Wait for the provider's one-time initialization.
    ///
    /// Must complete before the first scoring call; a failure here is fatal
    /// to the analysis run.
    pub async fn ready(&self) -> Result<()> {
        self.provider.ready().await
    }

    /// Encode a single text into an embedding vector
    pub async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.provider.embed(text).await
    }

    /// Cosine similarity between a code snippet and its documentation text,
    /// clamped to [0, 1].
    ///
    /// Returns 0.0 for empty documentation; absence of documentation is
    /// classified as `missing` upstream rather than scored here.
    pub async fn similarity(&self, code_text: &str, doc_text: &str) -> Result<f64> {
        if doc_text.trim().is_empty() {
            return Ok(0.0);
        }

        let vectors = self
            .provider
            .embed_batch(&[code_text.to_string(), doc_text.to_string()])
            .await?;

        let similarity = cosine_similarity(&vectors[0], &vectors[1]);
        Ok(similarity.clamp(0.0, 1.0))
    }
}
