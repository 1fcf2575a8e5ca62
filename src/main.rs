//! # Pathagar CLI (`ptg`)
//!
//! The `ptg` binary drives the pipeline: ingesting the knowledge-base
//! folder, inspecting retrieval, asking grounded questions, and cleaning
//! raw OCR dumps offline.
//!
//! ## Usage
//!
//! ```bash
//! ptg --config ./config/pathagar.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ptg ingest` | Extract, clean, chunk, embed, and upsert the knowledge-base folder |
//! | `ptg search "<query>"` | Retrieve the context chunks for a query |
//! | `ptg ask "<question>"` | Retrieve context and generate a grounded answer |
//! | `ptg clean <in> <out>` | Clean a raw OCR text dump offline |

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pathagar::config::{load_config, Config};
use pathagar::embedding::OllamaEmbedder;
use pathagar::extract::create_extractor;
use pathagar::generate::LlmClient;
use pathagar::ingest::run_ingest;
use pathagar::models::{Conversation, Message};
use pathagar::normalize::{strip_structured_noise, Normalizer};
use pathagar::prompt::{assemble, SYSTEM_PROMPT};
use pathagar::retrieval::{load_stopwords, retrieve_context};
use pathagar::vector_store::QdrantStore;

/// Pathagar — a retrieval-augmented question answering pipeline for Bengali
/// textbook PDFs.
#[derive(Parser)]
#[command(
    name = "ptg",
    about = "Pathagar — retrieval-augmented question answering over Bengali textbook PDFs",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/pathagar.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the knowledge-base folder into the vector store.
    ///
    /// Already-ingested documents (same normalized content) are skipped via
    /// the content hash index; the pass is idempotent.
    Ingest {
        /// Override the configured knowledge-base folder.
        #[arg(long)]
        folder: Option<PathBuf>,
    },

    /// Retrieve the context chunks for a query, without generation.
    Search {
        query: String,

        /// Number of chunks to retrieve (defaults to retrieval.top_k).
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Ask a question: retrieve context and generate a grounded answer.
    Ask {
        question: String,

        /// Number of chunks to retrieve (defaults to retrieval.top_k).
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Clean a raw OCR text dump offline.
    Clean {
        input: PathBuf,
        output: PathBuf,

        /// Also remove enumerated questions, MCQ options, and answer lines.
        #[arg(long)]
        strip_questions: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { folder } => {
            let mut config = load_config(&cli.config)?;
            if let Some(folder) = folder {
                config.knowledge_base.root = folder;
            }
            run_ingest_command(&config).await
        }
        Commands::Search { query, k } => {
            let config = load_config(&cli.config)?;
            run_search_command(&config, &query, k).await
        }
        Commands::Ask { question, k } => {
            let config = load_config(&cli.config)?;
            run_ask_command(&config, &question, k).await
        }
        Commands::Clean {
            input,
            output,
            strip_questions,
        } => run_clean_command(&input, &output, strip_questions),
    }
}

async fn run_ingest_command(config: &Config) -> Result<()> {
    let extractor = create_extractor(&config.extraction)?;
    let embedder = OllamaEmbedder::new(&config.embedding)?;
    let store = QdrantStore::new(&config.qdrant.url, config.qdrant.timeout_secs)?;

    let summary = run_ingest(config, extractor.as_ref(), &embedder, &store).await?;

    println!("ingest {}", config.knowledge_base.root.display());
    println!("  documents scanned: {}", summary.scanned);
    println!("  documents ingested: {}", summary.ingested);
    println!("  duplicates skipped: {}", summary.duplicates);
    println!("  extraction failures: {}", summary.failures);
    println!("  chunks written: {}", summary.chunks_written);
    println!("ok");
    Ok(())
}

async fn run_search_command(config: &Config, query: &str, k: Option<usize>) -> Result<()> {
    let context = retrieve(config, query, k).await?;
    if context.is_empty() {
        println!("No results.");
    } else {
        println!("{}", context);
    }
    Ok(())
}

async fn run_ask_command(config: &Config, question: &str, k: Option<usize>) -> Result<()> {
    let mut conversation = Conversation::with_system(SYSTEM_PROMPT);
    conversation.push(Message::human(question));

    let query = conversation.last_human().unwrap_or(question).to_string();
    let context = retrieve(config, &query, k).await?;
    let prompt = assemble(&context, &query);

    let llm = LlmClient::new(&config.llm)?;
    let answer = llm.complete(&conversation.messages_for_generation(&prompt)).await?;
    conversation.push(Message::ai(&answer));

    println!("{}", answer);
    Ok(())
}

async fn retrieve(config: &Config, query: &str, k: Option<usize>) -> Result<String> {
    let embedder = OllamaEmbedder::new(&config.embedding)?;
    let store = QdrantStore::new(&config.qdrant.url, config.qdrant.timeout_secs)?;
    let normalizer = match &config.knowledge_base.boilerplate_path {
        Some(path) => Normalizer::from_file(path)?,
        None => Normalizer::new(),
    };

    let stopwords: Option<HashSet<String>> = if config.retrieval.strip_stopwords {
        Some(load_stopwords(
            &config.retrieval.stopword_dir,
            &config.retrieval.language,
        )?)
    } else {
        None
    };

    retrieve_context(
        &store,
        &embedder,
        &normalizer,
        &config.qdrant.collection,
        query,
        k.unwrap_or(config.retrieval.top_k),
        stopwords.as_ref(),
    )
    .await
}

fn run_clean_command(input: &Path, output: &Path, strip_questions: bool) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let text = if strip_questions {
        strip_structured_noise(&text)
    } else {
        text
    };
    let cleaned = Normalizer::new().normalize(&text);

    std::fs::write(output, &cleaned)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("clean {}", input.display());
    println!("  lines kept: {}", cleaned.lines().count());
    println!("  written: {}", output.display());
    println!("ok");
    Ok(())
}
