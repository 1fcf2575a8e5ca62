//! Content-addressed dedup index for ingested documents.
//!
//! Maps the SHA-256 digest of a document's *normalized* text to its source
//! display name, persisted as a pretty-printed JSON object. Hashing after
//! normalization is deliberate: re-OCRing the same source can yield
//! byte-different but semantically identical text, and normalizing first
//! raises the dedup hit-rate. The index is written once at the end of an
//! ingestion pass and assumes a single writer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// SHA-256 hex digest of the given text.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Persisted `hash -> source name` mapping. Entries are append-only within a
/// process lifetime; an existing hash is never overwritten.
#[derive(Debug)]
pub struct HashIndex {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl HashIndex {
    /// Load the index from `path`. A missing file is an empty index, not an
    /// error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read hash index: {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Hash index is not valid JSON: {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.entries.contains_key(hash)
    }

    /// Record a hash. No-op if the hash is already present.
    pub fn record(&mut self, hash: String, source_name: String) {
        self.entries.entry(hash).or_insert(source_name);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the whole mapping, replacing any prior file atomically
    /// (write to a temp file, then rename over the target).
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create hash index directory: {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize hash index")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write hash index: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace hash index: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let index = HashIndex::load(dir.path().join("absent.json")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tmp/vector_hash_index.json");

        let mut index = HashIndex::load(&path).unwrap();
        index.record(content_hash("বাংলা পাঠ"), "doc.pdf".to_string());
        index.save().unwrap();

        let reloaded = HashIndex::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains(&content_hash("বাংলা পাঠ")));
    }

    #[test]
    fn record_never_overwrites() {
        let dir = tempdir().unwrap();
        let mut index = HashIndex::load(dir.path().join("index.json")).unwrap();
        index.record("h1".to_string(), "first.pdf".to_string());
        index.record("h1".to_string(), "second.pdf".to_string());
        assert_eq!(index.len(), 1);

        index.save().unwrap();
        let data = std::fs::read_to_string(index.path()).unwrap();
        assert!(data.contains("first.pdf"));
        assert!(!data.contains("second.pdf"));
    }

    #[test]
    fn hash_is_deterministic_and_content_addressed() {
        assert_eq!(content_hash("একই লেখা"), content_hash("একই লেখা"));
        assert_ne!(content_hash("একই লেখা"), content_hash("অন্য লেখা"));
    }

    #[test]
    fn persisted_format_is_a_json_object() {
        let dir = tempdir().unwrap();
        let mut index = HashIndex::load(dir.path().join("index.json")).unwrap();
        index.record("abc123".to_string(), "doc.pdf".to_string());
        index.save().unwrap();

        let data = std::fs::read_to_string(index.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(parsed["abc123"], "doc.pdf");
    }
}
