//! The ingestion driver.

use poetry_core::{
  model::{IngestedPoem, PoemRecord, TableCounts},
  normalize::clean_title,
  outcome::{Outcome, Skip},
  store::PoetryStore,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  backfill::{self, BackfillSummary},
  client::PoetryDbClient,
  error::IngestError,
};

// ─── Options and report ──────────────────────────────────────────────────────

/// Knobs for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
  /// Run the backfill normalizer after all titles are processed.
  pub backfill:   bool,
  /// Only process the first `n` titles of the remote list.
  pub max_titles: Option<usize>,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self {
      backfill:   true,
      max_titles: None,
    }
  }
}

/// What a run did. Per-title problems are counted here, never returned as
/// errors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
  pub authors_fetched:  usize,
  pub authors_inserted: usize,
  pub titles_seen:      usize,
  pub poems_inserted:   usize,
  pub lines_inserted:   usize,
  /// Titles with no usable data, an unknown author, or already stored.
  pub skipped:          usize,
  /// Titles whose fetch or insert failed.
  pub failed:           usize,
  pub backfill:         Option<BackfillSummary>,
  /// Table sizes at the end of the run.
  pub totals:           Option<TableCounts>,
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Fetches everything from the API and writes it to `S`, one title at a time.
///
/// There is no retry: a title that fails is dropped for this run. Running
/// again picks it up, since everything already stored is skipped.
pub struct Ingestor<S> {
  client:  PoetryDbClient,
  store:   S,
  options: RunOptions,
}

impl<S: PoetryStore> Ingestor<S> {
  pub fn new(client: PoetryDbClient, store: S, options: RunOptions) -> Self {
    Self { client, store, options }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Run the whole pipeline.
  ///
  /// Only failures that leave nothing to iterate over are returned: the
  /// author list, the author upsert, and the title list.
  pub async fn run(&self) -> Result<IngestReport, IngestError> {
    let mut report = IngestReport::default();

    let authors = self
      .client
      .fetch_authors()
      .await
      .map_err(IngestError::Authors)?;
    report.authors_fetched = authors.len();
    report.authors_inserted = self
      .store
      .upsert_authors(authors)
      .await
      .map_err(IngestError::store)?;
    info!(
      fetched = report.authors_fetched,
      inserted = report.authors_inserted,
      "authors stored"
    );

    let mut titles = self
      .client
      .fetch_titles()
      .await
      .map_err(IngestError::Titles)?;
    if let Some(max) = self.options.max_titles {
      titles.truncate(max);
    }
    info!(count = titles.len(), "ingesting poems");

    for title in &titles {
      report.titles_seen += 1;
      self.ingest_title(title, &mut report).await;
    }
    info!(
      inserted = report.poems_inserted,
      lines = report.lines_inserted,
      skipped = report.skipped,
      failed = report.failed,
      "poems stored"
    );

    if self.options.backfill {
      report.backfill = Some(backfill::run(&self.store).await);
    }

    match self.store.counts().await {
      Ok(counts) => {
        info!(
          authors = counts.authors,
          poems = counts.poems,
          lines = counts.lines,
          "run complete"
        );
        report.totals = Some(counts);
      }
      Err(e) => warn!(error = %e, "could not count stored rows"),
    }

    Ok(report)
  }

  /// Fetch and store one title. Never fails; the outcome lands in `report`.
  async fn ingest_title(&self, title: &str, report: &mut IngestReport) {
    let record = match self.client.fetch_poem(title).await {
      Ok(Outcome::Done(record)) => record,
      Ok(Outcome::Skipped(reason)) => {
        debug!(title, %reason, "no usable poem data");
        report.skipped += 1;
        return;
      }
      Err(e) => {
        warn!(title, error = %e, "failed to fetch poem");
        report.failed += 1;
        return;
      }
    };

    match self.store_record(record).await {
      Ok(Outcome::Done(ingested)) => {
        debug!(title, poem_id = ingested.poem_id, lines = ingested.lines_inserted, "poem stored");
        report.poems_inserted += 1;
        report.lines_inserted += ingested.lines_inserted;
      }
      Ok(Outcome::Skipped(reason @ Skip::DuplicateTitle(_))) => {
        debug!(title, %reason, "poem skipped");
        report.skipped += 1;
      }
      Ok(Outcome::Skipped(reason)) => {
        info!(title, %reason, "poem skipped");
        report.skipped += 1;
      }
      Err(e) => {
        warn!(title, error = %e, "failed to insert poem; rolled back");
        report.failed += 1;
      }
    }
  }

  /// Store a poem unless its title, once cleaned, is already taken.
  ///
  /// Stored titles are cleaned by the backfill, so the raw title of a poem
  /// ingested on an earlier run no longer matches the unique key.
  async fn store_record(
    &self,
    record: PoemRecord,
  ) -> Result<Outcome<IngestedPoem>, S::Error> {
    let cleaned = clean_title(&record.title);
    if cleaned != record.title && self.store.poem_by_title(cleaned.clone()).await?.is_some() {
      return Ok(Outcome::Skipped(Skip::DuplicateTitle(cleaned)));
    }
    self.store.ingest_poem(record).await
  }
}
