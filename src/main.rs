//! # docqa CLI
//!
//! Command-line shell around the ingestion and query pipelines.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docqa ingest <file>` | Index a PDF under its content fingerprint |
//! | `docqa ask <namespace> "<question>"` | Answer a question from one indexed document |
//! | `docqa chat <file>` | Index a PDF, then answer questions read from stdin |
//! | `docqa namespace <file>` | Print the content fingerprint of a file |
//!
//! Credentials come from the environment (or a `.env` file):
//! `GOOGLE_API_KEY`, `PINECONE_API_KEY`, `PINECONE_INDEX`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use docqa::config::{self, Config, Credentials};
use docqa::store::{self, VectorStore};
use docqa::{answer_question, document_namespace, ingest_document, RagContext};

/// docqa — ask questions about a PDF, answered only from its own text.
#[derive(Parser)]
#[command(
    name = "docqa",
    about = "docqa — retrieval-augmented question answering over PDF documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When omitted, built-in defaults are used (Gemini embeddings and
    /// generation, Pinecone store).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a PDF.
    ///
    /// Extracts, chunks and embeds the document and stores the vectors
    /// under the file's content fingerprint, which is printed.
    Ingest {
        /// Path to the PDF.
        path: PathBuf,
    },

    /// Answer a question about an indexed document.
    Ask {
        /// Namespace printed by `docqa ingest`.
        namespace: String,
        /// The question.
        question: String,
    },

    /// Index a PDF, then answer questions read line by line from stdin.
    ///
    /// Type `exit` or `quit` (or send EOF) to stop.
    Chat {
        /// Path to the PDF.
        path: PathBuf,
    },

    /// Print the content fingerprint (namespace) of a file.
    Namespace {
        /// Path to the file.
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Namespace { path } = &cli.command {
        let bytes = read_document(path)?;
        println!("{}", document_namespace(&bytes));
        return Ok(());
    }

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    let credentials = Credentials::from_env();
    let store_config = cfg.store.clone();
    // Providers first: a missing key fails before any store round-trip.
    let ctx = RagContext::from_config(cfg, &credentials)?;
    let store = store::create_store(&store_config, &credentials).await?;

    match cli.command {
        Commands::Ingest { path } => {
            run_ingest(&ctx, store.as_ref(), &path).await?;
        }
        Commands::Ask {
            namespace,
            question,
        } => {
            let answer = answer_question(&ctx, Some(store.as_ref()), &question, &namespace).await?;
            println!("{}", answer);
        }
        Commands::Chat { path } => {
            let namespace = run_ingest(&ctx, store.as_ref(), &path).await?;
            run_chat(&ctx, store.as_ref(), &namespace).await?;
        }
        Commands::Namespace { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn run_ingest(
    ctx: &RagContext,
    store: &dyn VectorStore,
    path: &Path,
) -> anyhow::Result<String> {
    let bytes = read_document(path)?;
    let namespace = document_namespace(&bytes);
    let report = ingest_document(ctx, Some(store), &bytes, &namespace)
        .await
        .with_context(|| format!("Processing failed for {}", path.display()))?;

    println!("ingest {}", path.display());
    println!("  namespace: {}", report.namespace);
    println!("  chunks: {}", report.chunks);
    println!("  batches: {}", report.batches);
    println!("ok");
    Ok(report.namespace)
}

async fn run_chat(ctx: &RagContext, store: &dyn VectorStore, namespace: &str) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        match answer_question(ctx, Some(store), &line, namespace).await {
            Ok(answer) => println!("{}", answer),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}
