//! Embedding collaborator client.
//!
//! The pipeline only needs a fixed-dimensionality vector per text; the model
//! itself runs behind an Ollama instance's `/api/embed` endpoint. Transient
//! errors (HTTP 429, 5xx, network) are retried with exponential backoff —
//! 1s, 2s, 4s, ... capped at 2^5 — while other client errors fail
//! immediately. A response vector whose length differs from the configured
//! dimensionality is a fatal error, never silently truncated or padded.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::config::EmbeddingConfig;

/// Embeds text into fixed-dimensionality vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Vector dimensionality every embedding must match.
    fn dims(&self) -> usize;

    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query text.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let vectors = self.embed_texts(&[text.to_string()]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Empty embedding response"))
    }
}

/// Client for an Ollama embedding model.
pub struct OllamaEmbedder {
    url: String,
    model: String,
    dims: usize,
    batch_size: usize,
    max_retries: u32,
    client: reqwest::Client,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dims: config.dims,
            batch_size: config.batch_size.max(1),
            max_retries: config.max_retries,
            client,
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(format!("{}/api/embed", self.url))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        let vectors = parse_embed_response(&json)?;
                        self.check_dims(&vectors)?;
                        if vectors.len() != texts.len() {
                            bail!(
                                "Embedding response count mismatch: sent {}, got {}",
                                texts.len(),
                                vectors.len()
                            );
                        }
                        return Ok(vectors);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err =
                            Some(anyhow!("Embedding API error {}: {}", status, body_text));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Embedding API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(anyhow!(
                        "Embedding connection error (is Ollama running at {}?): {}",
                        self.url,
                        e
                    ));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("Embedding failed after retries")))
    }

    fn check_dims(&self, vectors: &[Vec<f32>]) -> Result<()> {
        for vector in vectors {
            if vector.len() != self.dims {
                bail!(
                    "Embedding dimension mismatch: model '{}' returned {} dims, collection is configured for {}",
                    self.model,
                    vector.len(),
                    self.dims
                );
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}

/// Extract the `embeddings` arrays from an `/api/embed` response.
fn parse_embed_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow!("Invalid embedding response: missing embeddings array"))?;

    let mut result = Vec::with_capacity(embeddings.len());
    for embedding in embeddings {
        let vec: Vec<f32> = embedding
            .as_array()
            .ok_or_else(|| anyhow!("Invalid embedding response: embedding is not an array"))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        result.push(vec);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_embed_response_extracts_vectors() {
        let json = serde_json::json!({
            "model": "multilingual-e5-base",
            "embeddings": [[0.1, 0.2], [0.3, 0.4]],
        });
        let vectors = parse_embed_response(&json).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], vec![0.1f32, 0.2]);
    }

    #[test]
    fn parse_embed_response_rejects_missing_array() {
        let json = serde_json::json!({"error": "model not found"});
        assert!(parse_embed_response(&json).is_err());
    }
}
