use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{Overrides, RagConfig};
use rag_search::{ContextOutcome, RagPipeline, SearchStrategy};
use rag_text_chunker::TextChunker;
use rag_vector_store::HashingEmbedder;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod config;

#[derive(Parser)]
#[command(name = "rag")]
#[command(about = "Hybrid semantic and keyword retrieval over text documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest documents into an in-memory store and retrieve context for a query
    Search(SearchArgs),

    /// Show how a document is split into chunks
    Chunk(ChunkArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Text file to ingest (repeatable)
    #[arg(long = "doc", required = true)]
    docs: Vec<PathBuf>,

    /// Query text
    #[arg(long)]
    query: String,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Candidates fetched by the vector stage
    #[arg(long)]
    candidate_k: Option<usize>,

    /// Results returned after re-ranking
    #[arg(long)]
    final_k: Option<usize>,

    /// Weight of semantic similarity against keyword overlap (0..=1)
    #[arg(long)]
    alpha: Option<f32>,

    /// Score every chunk instead of running the vector stage first
    #[arg(long)]
    linear: bool,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ChunkArgs {
    /// Text file to split
    #[arg(long)]
    doc: PathBuf,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    documents: usize,
    chunks_stored: usize,
    chunks_skipped: usize,
    #[serde(flatten)]
    outcome: &'a ContextOutcome,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Search(args) => run_search(args).await?,
        Commands::Chunk(args) => run_chunk(args).await?,
    }

    Ok(())
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let mut config = RagConfig::load_or_default(args.config.as_deref()).await?;
    config.apply_overrides(Overrides {
        candidate_k: args.candidate_k,
        final_k: args.final_k,
        alpha: args.alpha,
    });
    config.validate()?;

    let embedder = HashingEmbedder::new(config.embedding.dimension)?;
    let strategy = if args.linear {
        SearchStrategy::Linear
    } else {
        SearchStrategy::TwoStage
    };
    let pipeline = RagPipeline::new(Arc::new(embedder))?
        .with_chunker(TextChunker::new(config.chunking)?)
        .with_metric(config.retrieval.metric)
        .with_strategy(strategy)
        .with_config(config.retrieval.to_retrieval_config())?;

    let mut stored = 0;
    let mut skipped = 0;
    for path in &args.docs {
        let text = read_document(path).await?;
        let report = pipeline
            .ingest_document(&text)
            .with_context(|| format!("Failed to ingest {}", path.display()))?;
        stored += report.stored.len();
        skipped += report.skipped;
    }

    let outcome = pipeline
        .retrieve_context(&args.query)
        .context("Retrieval failed")?;

    if args.json {
        let output = SearchOutput {
            query: &args.query,
            documents: args.docs.len(),
            chunks_stored: stored,
            chunks_skipped: skipped,
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &outcome {
        ContextOutcome::Trivial => {
            println!("Query needs no retrieved context.");
        }
        ContextOutcome::Retrieved {
            results,
            merged_context,
        } => {
            if results.is_empty() {
                println!("No results.");
                return Ok(());
            }
            for (i, result) in results.iter().enumerate() {
                println!(
                    "{}. chunk {} (score: {:.3}, semantic: {:.3}, lexical: {:.3})",
                    i + 1,
                    result.id,
                    result.score,
                    result.semantic,
                    result.lexical
                );
                println!("   {}", preview(&result.text, 120));
                println!();
            }
            println!("--- merged context ---");
            println!("{merged_context}");
        }
    }
    Ok(())
}

async fn run_chunk(args: ChunkArgs) -> Result<()> {
    let config = RagConfig::load_or_default(args.config.as_deref()).await?;
    config.validate()?;
    let chunker = TextChunker::new(config.chunking)?;

    let text = read_document(&args.doc).await?;
    let chunks = chunker.chunk(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    for chunk in &chunks {
        println!(
            "{}. words {}-{} ({} words)",
            chunk.ordinal + 1,
            chunk.start_word,
            chunk.end_word,
            chunk.word_count()
        );
        println!("   {}", preview(&chunk.content, 120));
    }
    Ok(())
}

async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read document {}", path.display()))
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
