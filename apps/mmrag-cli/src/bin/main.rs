//! mmrag — ask questions about one document from the command line.
//!
//! Usage:
//!   mmrag ask <document-dir> "<question>"        # retrieve + generate (needs GROQ_API_KEY)
//!   mmrag retrieve <document-dir> "<question>"   # show retrieved chunks and images only
//!   mmrag ingest <document-dir>                  # report what gets indexed
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use mmrag_core::config::{Config, Settings};
use mmrag_core::extract::DirectoryExtractor;
use mmrag_core::traits::DocumentExtractor;
use mmrag_embed::load_embedders;
use mmrag_engine::{RetrievalEngine, Session};

#[derive(Parser)]
#[command(name = "mmrag", version, about = "🔎 Multimodal question answering over a single document")]
struct Cli {
    /// Directory holding config.toml; model paths resolve against it
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Retrieve context and generate a grounded answer
    Ask { document: PathBuf, query: String },
    /// Retrieve context without calling the completion API
    Retrieve { document: PathBuf, query: String },
    /// Ingest a document and print the ingestion report
    Ingest { document: PathBuf },
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn retrieval_engine(settings: &Settings, base: &Path) -> Result<RetrievalEngine> {
    let embedders = load_embedders(&settings.embedding, base)?;
    Ok(RetrievalEngine::new(settings.chunking, embedders.text, embedders.image)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = Config::load_from(&cli.config_dir).map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    tracing::debug!("⚙️  Environment: {}", config.env_name());

    match cli.command {
        Command::Ask { document, query } => {
            let mut session = Session::from_settings(&settings, &cli.config_dir)?;
            let pb = spinner("Answering…");
            let result = session.answer_query(&document, &query);
            pb.finish_and_clear();
            let answer = result?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}\n", answer.answer);
                println!("Relevant text:");
                for (i, text) in answer.relevant_text.iter().enumerate() { println!("  {}. {}", i + 1, text); }
                println!("Relevant images:");
                for path in &answer.relevant_image_paths { println!("  - {}", path); }
            }
        }
        Command::Retrieve { document, query } => {
            let mut engine = retrieval_engine(&settings, &cli.config_dir)?;
            let extracted = DirectoryExtractor::new().extract(&document)?;
            let pb = spinner("Indexing…");
            let report = engine.ingest(&extracted);
            pb.finish_and_clear();
            report?;
            let retrieval = engine.query(&query, settings.retrieval.top_k)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&retrieval)?);
            } else {
                for (i, text) in retrieval.text.iter().enumerate() { println!("{}. {}", i + 1, text); }
                for path in &retrieval.image_paths { println!("🖼️  {}", path); }
            }
        }
        Command::Ingest { document } => {
            let mut engine = retrieval_engine(&settings, &cli.config_dir)?;
            let extracted = DirectoryExtractor::new().extract(&document)?;
            let pb = spinner("Indexing…");
            let report = engine.ingest(&extracted);
            pb.finish_and_clear();
            let report = report?;
            println!("✅ {} chunk(s), {} image(s) indexed", report.text_entries, report.image_entries);
            for skipped in &report.skipped { println!("⚠️  skipped: {}", skipped); }
        }
    }
    Ok(())
}
