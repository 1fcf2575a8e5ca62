//! # Pathagar
//!
//! A retrieval-augmented question answering pipeline for Bengali textbook
//! PDFs.
//!
//! Pathagar ingests a folder of PDF documents (many of them scanned and
//! OCR'd), cleans the noisy extracted text, chunks and embeds it into a
//! Qdrant collection, and at query time retrieves the most similar chunks
//! to ground a language model's answer.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────────┐   ┌──────────┐
//! │ PDF folder │──▶│     Pipeline      │──▶│  Qdrant  │
//! │ (text/OCR) │   │ Clean+Chunk+Embed│   │ (cosine) │
//! └────────────┘   └──────────────────┘   └────┬─────┘
//!                                              │
//!                          query ──▶ retrieve ─┤
//!                                              ▼
//!                                     ┌────────────────┐
//!                                     │ prompt + LLM   │
//!                                     └────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types and conversation state |
//! | [`normalize`] | OCR noise cleanup |
//! | [`chunk`] | Recursive separator-based chunking |
//! | [`hash_index`] | Content-addressed dedup index |
//! | [`extract`] | PDF / OCR text extraction |
//! | [`embedding`] | Embedding collaborator client |
//! | [`vector_store`] | Qdrant client and in-memory store |
//! | [`ingest`] | Ingestion pipeline orchestration |
//! | [`retrieval`] | Query-time retrieval |
//! | [`prompt`] | Prompt assembly |
//! | [`generate`] | Generation collaborator client |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod extract;
pub mod generate;
pub mod hash_index;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod retrieval;
pub mod vector_store;
