//! Vector store collaborator.
//!
//! The [`VectorStore`] trait covers exactly what the pipeline needs:
//! idempotent collection creation, point upsert, and cosine top-k search.
//! [`QdrantStore`] talks to a Qdrant instance over its REST API;
//! [`InMemoryStore`] is a brute-force implementation used by tests.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::ScoredChunk;

/// One embedded chunk ready for upsert.
#[derive(Debug, Clone)]
pub struct PointRecord {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub text: String,
    pub source: String,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// Create a collection with the given dimensionality and cosine distance.
    async fn create_collection(&self, name: &str, dims: usize) -> Result<()>;

    /// Check-then-create. Not transactional; the pipeline assumes a single
    /// writer.
    async fn ensure_collection(&self, name: &str, dims: usize) -> Result<()> {
        if !self.collection_exists(name).await? {
            self.create_collection(name, dims).await?;
        }
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<PointRecord>) -> Result<()>;

    /// Top-`k` nearest records by cosine similarity, best first. An empty
    /// result is a valid state, not an error.
    async fn search(&self, collection: &str, vector: &[f32], k: usize)
        -> Result<Vec<ScoredChunk>>;
}

// ============ Qdrant REST client ============

pub struct QdrantStore {
    base_url: String,
    client: reqwest::Client,
}

impl QdrantStore {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn read_body(response: reqwest::Response) -> Result<serde_json::Value> {
        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Qdrant API error {}: {}", status, body_text);
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let resp = self
            .client
            .get(format!("{}/collections/{}/exists", self.base_url, name))
            .send()
            .await?;
        let json = Self::read_body(resp).await?;
        json.pointer("/result/exists")
            .and_then(|v| v.as_bool())
            .ok_or_else(|| anyhow!("Invalid Qdrant response: missing result.exists"))
    }

    async fn create_collection(&self, name: &str, dims: usize) -> Result<()> {
        let body = serde_json::json!({
            "vectors": { "size": dims, "distance": "Cosine" },
        });
        let resp = self
            .client
            .put(format!("{}/collections/{}", self.base_url, name))
            .json(&body)
            .send()
            .await?;
        Self::read_body(resp).await?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<PointRecord>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let points: Vec<serde_json::Value> = points
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id.to_string(),
                    "vector": p.vector,
                    "payload": { "text": p.text, "source": p.source },
                })
            })
            .collect();
        let body = serde_json::json!({ "points": points });
        let resp = self
            .client
            .put(format!(
                "{}/collections/{}/points?wait=true",
                self.base_url, collection
            ))
            .json(&body)
            .send()
            .await?;
        Self::read_body(resp).await?;
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let body = serde_json::json!({
            "vector": vector,
            "limit": k,
            "with_payload": true,
        });
        let resp = self
            .client
            .post(format!(
                "{}/collections/{}/points/search",
                self.base_url, collection
            ))
            .json(&body)
            .send()
            .await?;
        let json = Self::read_body(resp).await?;

        let hits = json
            .pointer("/result")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow!("Invalid Qdrant response: missing result array"))?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let score = hit
                .get("score")
                .and_then(|v| v.as_f64())
                .ok_or_else(|| anyhow!("Invalid Qdrant response: hit without score"))?;
            let text = hit
                .pointer("/payload/text")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            results.push(ScoredChunk {
                text: text.to_string(),
                score: score as f32,
            });
        }
        Ok(results)
    }
}

// ============ In-memory store ============

struct MemoryCollection {
    dims: usize,
    points: Vec<PointRecord>,
}

/// Brute-force in-memory store for tests.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points held in a collection (0 if absent).
    pub fn point_count(&self, collection: &str) -> usize {
        let collections = self.collections.read().unwrap();
        collections.get(collection).map_or(0, |c| c.points.len())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let collections = self.collections.read().unwrap();
        Ok(collections.contains_key(name))
    }

    async fn create_collection(&self, name: &str, dims: usize) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        collections.entry(name.to_string()).or_insert(MemoryCollection {
            dims,
            points: Vec::new(),
        });
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<PointRecord>) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| anyhow!("Collection not found: {}", collection))?;
        for point in &points {
            if point.vector.len() != coll.dims {
                bail!(
                    "Vector dimension mismatch: point has {} dims, collection '{}' has {}",
                    point.vector.len(),
                    collection,
                    coll.dims
                );
            }
        }
        coll.points.extend(points);
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let collections = self.collections.read().unwrap();
        let coll = collections
            .get(collection)
            .ok_or_else(|| anyhow!("Collection not found: {}", collection))?;

        let mut results: Vec<ScoredChunk> = coll
            .points
            .iter()
            .map(|p| ScoredChunk {
                text: p.text.clone(),
                score: cosine_similarity(vector, &p.vector),
            })
            .collect();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        Ok(results)
    }
}
