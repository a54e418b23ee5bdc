//! The `PoetryStore` trait.
//!
//! Implemented by storage backends (e.g. `poetry-store-sqlite`). The ingestion
//! driver and the backfill normalizer depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  model::{
    Author, BackfillReport, IngestedPoem, Line, NewPoem, Poem, PoemId, PoemRecord,
    TableCounts,
  },
  outcome::Outcome,
};

/// A cleaning rule applied by the backfill passes.
pub type Cleaner = fn(&str) -> String;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a relational poetry store.
///
/// Inserts are conflict-tolerant: a natural key that is already present is
/// reported as [`Outcome::Skipped`], never as an error, so the whole ingestion
/// can be re-run safely. Every method runs in its own transaction and rolls it
/// back on error.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait PoetryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Authors ───────────────────────────────────────────────────────────

  /// Insert every name not already present. Returns how many were new.
  fn upsert_authors(
    &self,
    names: Vec<String>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Poems and lines ───────────────────────────────────────────────────

  /// Insert a poem row.
  ///
  /// Skips with [`crate::Skip::AuthorNotFound`] when the author is unknown
  /// (no placeholder author is created) and with
  /// [`crate::Skip::DuplicateTitle`] when the title is already stored.
  fn insert_poem(
    &self,
    poem: NewPoem,
  ) -> impl Future<Output = Result<Outcome<PoemId>, Self::Error>> + Send + '_;

  /// Insert the lines of a poem, numbered from 1, in one transaction.
  ///
  /// `None` writes nothing and skips with [`crate::Skip::NoPoemId`]. A
  /// `(poem_id, line_number)` pair that already exists is left alone.
  /// Returns how many rows were inserted.
  fn insert_lines(
    &self,
    poem_id: Option<PoemId>,
    lines: Vec<String>,
  ) -> impl Future<Output = Result<Outcome<usize>, Self::Error>> + Send + '_;

  /// Insert a poem and its lines atomically; same skip rules as
  /// [`PoetryStore::insert_poem`].
  fn ingest_poem(
    &self,
    record: PoemRecord,
  ) -> impl Future<Output = Result<Outcome<IngestedPoem>, Self::Error>> + Send + '_;

  // ── Backfill ──────────────────────────────────────────────────────────

  /// Rewrite every stored title with `clean` in a single transaction.
  ///
  /// A poem whose cleaned title is already stored is a duplicate: it is
  /// deleted together with its lines and counted in
  /// [`BackfillReport::deleted`].
  fn backfill_titles(
    &self,
    clean: Cleaner,
  ) -> impl Future<Output = Result<BackfillReport, Self::Error>> + Send + '_;

  /// Rewrite every stored line with `clean` in a single transaction,
  /// deleting lines whose cleaned content is empty.
  fn backfill_lines(
    &self,
    clean: Cleaner,
  ) -> impl Future<Output = Result<BackfillReport, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn counts(&self) -> impl Future<Output = Result<TableCounts, Self::Error>> + Send + '_;

  fn list_authors(&self) -> impl Future<Output = Result<Vec<Author>, Self::Error>> + Send + '_;

  /// Retrieve a poem by its exact stored title. Returns `None` if not found.
  fn poem_by_title(
    &self,
    title: String,
  ) -> impl Future<Output = Result<Option<Poem>, Self::Error>> + Send + '_;

  /// All lines of a poem ordered by line number.
  fn lines_for_poem(
    &self,
    poem_id: PoemId,
  ) -> impl Future<Output = Result<Vec<Line>, Self::Error>> + Send + '_;
}
