//! Ingestion pipeline orchestration.
//!
//! Coordinates the full pass over the knowledge-base folder: enumerate →
//! extract → normalize → hash/dedup → chunk → embed → upsert → record hash.
//! Extraction failure skips the document and the pass continues; hash-index
//! persistence failure and dimension mismatches abort the pass.
//!
//! The hash index is persisted once at the end of the pass, not per file.
//! A crash mid-pass therefore loses dedup bookkeeping for documents already
//! processed, and a retry can write their vectors again; accepted, since
//! chunk-level upsert is not idempotent either. Single writer assumed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::chunk::{split_text, DEFAULT_SEPARATORS};
use crate::config::{Config, KnowledgeBaseConfig};
use crate::embedding::Embedder;
use crate::extract::TextExtractor;
use crate::hash_index::{content_hash, HashIndex};
use crate::normalize::Normalizer;
use crate::vector_store::{PointRecord, VectorStore};

/// Counters reported at the end of a folder pass.
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub scanned: u64,
    pub ingested: u64,
    pub duplicates: u64,
    pub failures: u64,
    pub chunks_written: u64,
}

/// Run one ingestion pass over the configured knowledge-base folder.
pub async fn run_ingest(
    config: &Config,
    extractor: &dyn TextExtractor,
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
) -> Result<IngestSummary> {
    let normalizer = build_normalizer(config)?;
    let mut index = HashIndex::load(&config.knowledge_base.hash_index_path)?;
    let files = scan_knowledge_base(&config.knowledge_base)?;

    let collection = &config.qdrant.collection;
    store
        .ensure_collection(collection, config.qdrant.vector_size)
        .await?;

    let mut summary = IngestSummary::default();

    for path in files {
        summary.scanned += 1;
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().trim().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let raw = match extractor.extract(&path) {
            Ok(text) => text,
            Err(err) => {
                println!("Skipping {}: {}", path.display(), err);
                summary.failures += 1;
                continue;
            }
        };

        let text = normalizer.normalize(&raw);
        let hash = content_hash(&text);
        if index.contains(&hash) {
            println!("Skipping {}: already ingested.", source_name);
            summary.duplicates += 1;
            continue;
        }

        let chunks = split_text(
            &text,
            config.chunking.max_chars,
            config.chunking.overlap_chars,
            DEFAULT_SEPARATORS,
        );

        if !chunks.is_empty() {
            let vectors = embedder.embed_texts(&chunks).await?;
            let points = chunks
                .iter()
                .zip(vectors)
                .map(|(text, vector)| PointRecord {
                    id: Uuid::new_v4(),
                    vector,
                    text: text.clone(),
                    source: source_name.clone(),
                })
                .collect::<Vec<_>>();
            summary.chunks_written += points.len() as u64;
            store.upsert(collection, points).await?;
        } else {
            println!("{}: no text survived cleaning.", source_name);
        }

        index.record(hash, source_name);
        summary.ingested += 1;
    }

    // Losing the index silently would defeat dedup on every future pass.
    index
        .save()
        .with_context(|| "Failed to persist the content hash index")?;

    Ok(summary)
}

fn build_normalizer(config: &Config) -> Result<Normalizer> {
    match &config.knowledge_base.boilerplate_path {
        Some(path) => Normalizer::from_file(path),
        None => Ok(Normalizer::new()),
    }
}

/// Enumerate matching documents under the knowledge-base root, sorted for a
/// deterministic pass order. Non-matching files get a printed notice only.
fn scan_knowledge_base(config: &KnowledgeBaseConfig) -> Result<Vec<PathBuf>> {
    let root = &config.root;
    if !root.exists() {
        anyhow::bail!("Knowledge-base folder does not exist: {}", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !include_set.is_match(relative) {
            println!("Skipping {}: unsupported document type.", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
