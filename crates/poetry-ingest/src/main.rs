//! `poetry-ingest` — load PoetryDB into a local SQLite store.
//!
//! # Usage
//!
//! ```
//! poetry-ingest run
//! poetry-ingest --config poetry.toml run --no-backfill --max-titles 100
//! poetry-ingest backfill
//! poetry-ingest stats
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use poetry_core::store::PoetryStore as _;
use poetry_ingest::{IngestConfig, Ingestor, PoetryDbClient, RunOptions, backfill};
use poetry_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Ingest PoetryDB poems into SQLite")]
struct Cli {
  /// Path to a TOML configuration file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fetch every poem, store it, then clean stored titles and lines.
  Run {
    /// Skip the cleaning passes at the end of the run.
    #[arg(long)]
    no_backfill: bool,

    /// Only process the first N titles.
    #[arg(long, value_name = "N")]
    max_titles: Option<usize>,
  },

  /// Re-apply the cleaning rules to everything already stored.
  Backfill,

  /// Print row counts for each table.
  Stats,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = IngestConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
  cfg.store.path = expand_tilde(&cfg.store.path);

  let store = SqliteStore::open(&cfg.store)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store.path))?;

  match cli.command {
    Command::Run { no_backfill, max_titles } => {
      let client = PoetryDbClient::new(&cfg.api).context("failed to create API client")?;
      let options = RunOptions { backfill: !no_backfill, max_titles };
      let report = Ingestor::new(client, store, options)
        .run()
        .await
        .context("ingestion aborted")?;
      println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Command::Backfill => {
      let summary = backfill::run(&store).await;
      println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Command::Stats => {
      let counts = store.counts().await.context("failed to count rows")?;
      println!("authors: {}", counts.authors);
      println!("poems:   {}", counts.poems);
      println!("lines:   {}", counts.lines);
    }
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
