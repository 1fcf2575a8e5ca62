//! Query-time retrieval.
//!
//! A query goes through the same text transforms the index went through —
//! stopword removal, then the ingestion normalizer — before being embedded
//! and searched. Skewing query-time and index-time transforms degrades
//! recall silently, so both sides share one [`Normalizer`].

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::embedding::Embedder;
use crate::normalize::Normalizer;
use crate::vector_store::VectorStore;

/// Load the stopword list for a language tag from `<dir>/<lang>.json`
/// (a JSON array of words, read wholesale).
pub fn load_stopwords(dir: &Path, lang: &str) -> Result<HashSet<String>> {
    let path = dir.join(format!("{lang}.json"));
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read stopword list: {}", path.display()))?;
    let words: Vec<String> = serde_json::from_str(&data)
        .with_context(|| format!("Stopword list is not a JSON array: {}", path.display()))?;
    Ok(words.into_iter().collect())
}

/// Allow-list stopword removal over whitespace tokens. No stemming.
pub fn strip_stopwords(query: &str, stopwords: &HashSet<String>) -> String {
    query
        .split_whitespace()
        .filter(|word| !stopwords.contains(*word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Retrieve the context string for a query: top-`k` chunk texts joined with
/// newlines, in the store's ranking order.
///
/// An empty knowledge base (or a query with no matches) yields an empty
/// string — a valid state the downstream prompt handles. Store transport
/// failures propagate as errors rather than masquerading as "no knowledge".
pub async fn retrieve_context(
    store: &dyn VectorStore,
    embedder: &dyn Embedder,
    normalizer: &Normalizer,
    collection: &str,
    query: &str,
    k: usize,
    stopwords: Option<&HashSet<String>>,
) -> Result<String> {
    let query = match stopwords {
        Some(words) => strip_stopwords(query, words),
        None => query.to_string(),
    };
    let query = normalizer.normalize(&query);
    if query.is_empty() {
        return Ok(String::new());
    }

    let vector = embedder.embed_query(&query).await?;
    let hits = store.search(collection, &vector, k).await?;

    Ok(hits
        .iter()
        .map(|hit| hit.text.as_str())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopwords(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn stopwords_removed_by_allow_list() {
        let words = stopwords(&["কি", "এর"]);
        assert_eq!(
            strip_stopwords("বাংলাদেশ এর রাজধানী কি", &words),
            "বাংলাদেশ রাজধানী"
        );
    }

    #[test]
    fn no_stemming_partial_tokens_kept() {
        let words = stopwords(&["কর"]);
        // "করা" is not in the list; only exact tokens are removed.
        assert_eq!(strip_stopwords("করা কর", &words), "করা");
    }

    #[test]
    fn stopword_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("bn.json"),
            r#"["এবং", "কি", "এর"]"#,
        )
        .unwrap();
        let words = load_stopwords(dir.path(), "bn").unwrap();
        assert_eq!(words.len(), 3);
        assert!(words.contains("এবং"));
    }

    #[test]
    fn missing_stopword_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_stopwords(dir.path(), "bn").is_err());
    }
}
