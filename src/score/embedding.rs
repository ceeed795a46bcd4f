//! Embedding providers
//!
//! Two implementations: an HTTP provider for Ollama-compatible endpoints,
//! and a deterministic feature-hashing provider that needs no model server
//! and doubles as the test stub.

use crate::error::{AnalyzeError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Trait for embedding providers.
///
/// Implementations are read-only after construction; `ready()` performs the
/// one-time initialization or availability check and is awaited by all
/// callers before the first embedding call.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// One-time initialization; fails with `ModelInit` when the model is
    /// unavailable
    async fn ready(&self) -> Result<()>;

    /// Generate embeddings for a batch of texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| AnalyzeError::Embedding("no embedding returned".to_string()))
    }

    /// Get the embedding dimension
    fn dimension(&self) -> usize;
}

/// Embedding provider backed by an Ollama-compatible HTTP endpoint
pub struct HttpEmbedding {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    dimension: usize,
}

impl HttpEmbedding {
    /// Create a provider for the given endpoint and model
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            dimension: 384, // common for sentence-transformer models
        }
    }

    async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.endpoint);

        let request = OllamaEmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzeError::Embedding(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzeError::Embedding(format!(
                "endpoint returned {}: {}",
                status, body
            )));
        }

        let result: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AnalyzeError::Embedding(format!("invalid response: {}", e)))?;

        Ok(result.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedding {
    async fn ready(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.endpoint);
        self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                AnalyzeError::ModelInit(format!(
                    "embedding endpoint {} unreachable: {}",
                    self.endpoint, e
                ))
            })?;
        Ok(())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_single(text).await?);
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Ollama embedding request
#[derive(Debug, Serialize)]
struct OllamaEmbeddingRequest {
    model: String,
    prompt: String,
}

/// Ollama embedding response
#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

/// Deterministic feature-hashing embedding.
///
/// Tokenizes on non-alphanumeric boundaries, lowercases, and accumulates
/// term frequencies into hash buckets. Texts sharing vocabulary land in the
/// same buckets, so cosine similarity tracks lexical overlap. Requires no
/// model server and always initializes.
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    /// Create a provider with the given vector dimension
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&digest[..8]);
            let bucket = u64::from_le_bytes(bytes) as usize % self.dimension;
            vector[bucket] += 1.0;
        }

        vector
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn ready(&self) -> Result<()> {
        Ok(())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_embedding_deterministic() {
        let provider = HashEmbedding::new(256);
        let a = provider.embed("Hello, world!").await.unwrap();
        assert_eq!(a.len(), 256);

        let b = provider.embed("Hello, world!").await.unwrap();
        assert_eq!(a, b);

        let c = provider.embed("Goodbye, world!").await.unwrap();
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_hash_embedding_batch_preserves_order() {
        let provider = HashEmbedding::new(64);
        let batch = provider
            .embed_batch(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("first").await.unwrap());
        assert_eq!(batch[1], provider.embed("second").await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_embedding_always_ready() {
        assert!(HashEmbedding::default().ready().await.is_ok());
    }
}
