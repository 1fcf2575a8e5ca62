use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    pub qdrant: QdrantConfig,
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeBaseConfig {
    /// Folder holding the source documents.
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default = "default_hash_index_path")]
    pub hash_index_path: PathBuf,
    /// Optional per-language boilerplate phrase list (JSON array).
    #[serde(default)]
    pub boilerplate_path: Option<PathBuf>,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.pdf".to_string()]
}

fn default_hash_index_path() -> PathBuf {
    PathBuf::from("./tmp/vector_hash_index.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// `text` for born-digital PDFs, `ocr` for scanned ones.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Argv template for the OCR strategy; `{input}` is the document path.
    #[serde(default = "default_ocr_command")]
    pub ocr_command: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            ocr_command: default_ocr_command(),
        }
    }
}

fn default_strategy() -> String {
    "text".to_string()
}

fn default_ocr_command() -> Vec<String> {
    vec!["bangla-pdf-ocr".to_string(), "{input}".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct QdrantConfig {
    #[serde(default = "default_qdrant_url")]
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_vector_size")]
    pub vector_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_qdrant_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_collection() -> String {
    "chatbot_context".to_string()
}

fn default_vector_size() -> usize {
    768
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,
    pub model: String,
    pub dims: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_batch_size() -> usize {
    64
}

fn default_max_retries() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            overlap_chars: default_overlap_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    100
}

fn default_overlap_chars() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_stopword_dir")]
    pub stopword_dir: PathBuf,
    #[serde(default = "default_strip_stopwords")]
    pub strip_stopwords: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            language: default_language(),
            stopword_dir: default_stopword_dir(),
            strip_stopwords: default_strip_stopwords(),
        }
    }
}

fn default_top_k() -> usize {
    10
}

fn default_language() -> String {
    "bn".to_string()
}

fn default_stopword_dir() -> PathBuf {
    PathBuf::from("./stop_words")
}

fn default_strip_stopwords() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            model: default_llm_model(),
            temperature: 0.0,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

fn default_llm_model() -> String {
    "gemma3:1b".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    120
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate chunking
    if config.chunking.max_chars == 0 {
        anyhow::bail!("chunking.max_chars must be > 0");
    }
    if config.chunking.overlap_chars >= config.chunking.max_chars {
        anyhow::bail!("chunking.overlap_chars must be smaller than chunking.max_chars");
    }

    // Validate retrieval
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    // Validate embedding against the collection: a silent dimensionality
    // swap corrupts the index, so refuse to start.
    if config.embedding.dims == 0 {
        anyhow::bail!("embedding.dims must be > 0");
    }
    if config.embedding.dims != config.qdrant.vector_size {
        anyhow::bail!(
            "embedding.dims ({}) does not match qdrant.vector_size ({})",
            config.embedding.dims,
            config.qdrant.vector_size
        );
    }

    match config.extraction.strategy.as_str() {
        "text" | "ocr" => {}
        other => anyhow::bail!("Unknown extraction strategy: '{}'. Use text or ocr.", other),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("pathagar.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    const MINIMAL: &str = r#"
[knowledge_base]
root = "./knowledge_bases"

[qdrant]

[embedding]
model = "multilingual-e5-base"
dims = 768
"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), MINIMAL);
        let config = load_config(&path).unwrap();

        assert_eq!(config.qdrant.collection, "chatbot_context");
        assert_eq!(config.qdrant.vector_size, 768);
        assert_eq!(config.chunking.max_chars, 100);
        assert_eq!(config.chunking.overlap_chars, 10);
        assert_eq!(config.retrieval.top_k, 10);
        assert_eq!(config.retrieval.language, "bn");
        assert_eq!(config.extraction.strategy, "text");
        assert_eq!(config.knowledge_base.include_globs, vec!["**/*.pdf"]);
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"
[knowledge_base]
root = "./kb"

[qdrant]
vector_size = 768

[embedding]
model = "multilingual-e5-base"
dims = 384
"#;
        let path = write_config(dir.path(), body);
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn overlap_must_be_smaller_than_max() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"
[knowledge_base]
root = "./kb"

[qdrant]

[embedding]
model = "m"
dims = 768

[chunking]
max_chars = 50
overlap_chars = 50
"#;
        let path = write_config(dir.path(), body);
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn unknown_extraction_strategy_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"
[knowledge_base]
root = "./kb"

[extraction]
strategy = "vision"

[qdrant]

[embedding]
model = "m"
dims = 768
"#;
        let path = write_config(dir.path(), body);
        assert!(load_config(&path).is_err());
    }
}
