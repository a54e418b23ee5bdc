//! [`SqliteStore`] — the SQLite implementation of [`PoetryStore`].

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension as _};
use serde::Deserialize;

use poetry_core::{
  model::{
    Author, AuthorId, BackfillReport, IngestedPoem, Line, NewPoem, Poem, PoemId, PoemRecord,
    TableCounts,
  },
  outcome::{Outcome, Skip},
  store::{Cleaner, PoetryStore},
};

use crate::{
  rows::{self, AUTHOR_COLUMNS, LINE_COLUMNS, POEM_COLUMNS},
  schema::SCHEMA,
  Result,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Where the store lives on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  pub path: PathBuf,
}

impl Default for StoreConfig {
  fn default() -> Self { Self { path: PathBuf::from("poetry.db") } }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A poetry store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Each
/// operation runs in its own transaction on that connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the store described by `config`.
  pub async fn open(config: &StoreConfig) -> Result<Self> { Self::open_path(&config.path).await }

  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open_path(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the store's connection.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────

/// Insert a poem row inside an open transaction.
fn insert_poem_row(conn: &Connection, poem: &NewPoem) -> rusqlite::Result<Outcome<PoemId>> {
  let author_id: Option<AuthorId> = conn
    .query_row(
      "SELECT author_id FROM authors WHERE author_name = ?1",
      rusqlite::params![poem.author],
      |r| r.get(0),
    )
    .optional()?;

  let Some(author_id) = author_id else {
    return Ok(Outcome::Skipped(Skip::AuthorNotFound(poem.author.clone())));
  };

  // DO NOTHING suppresses the RETURNING row, so "no row" means the title
  // was already taken.
  let poem_id: Option<PoemId> = conn
    .query_row(
      "INSERT INTO poems (author_id, poem_title, line_count) VALUES (?1, ?2, ?3)
       ON CONFLICT (poem_title) DO NOTHING
       RETURNING poem_id",
      rusqlite::params![author_id, poem.title, poem.line_count],
      |r| r.get(0),
    )
    .optional()?;

  Ok(match poem_id {
    Some(id) => Outcome::Done(id),
    None     => Outcome::Skipped(Skip::DuplicateTitle(poem.title.clone())),
  })
}

/// Insert lines numbered from 1 inside an open transaction.
fn insert_line_rows(conn: &Connection, poem_id: PoemId, lines: &[String]) -> rusqlite::Result<usize> {
  let mut stmt = conn.prepare_cached(
    "INSERT INTO lines (poem_id, line_number, line_content) VALUES (?1, ?2, ?3)
     ON CONFLICT (poem_id, line_number) DO NOTHING",
  )?;

  let mut inserted = 0;
  for (line_number, content) in (1_i64..).zip(lines) {
    inserted += stmt.execute(rusqlite::params![poem_id, line_number, content])?;
  }
  Ok(inserted)
}

fn count_rows(conn: &Connection, sql: &str) -> rusqlite::Result<u64> {
  let n: i64 = conn.query_row(sql, [], |r| r.get(0))?;
  Ok(n as u64)
}

// ─── PoetryStore impl ────────────────────────────────────────────────────────

impl PoetryStore for SqliteStore {
  type Error = crate::Error;

  // ── Authors ───────────────────────────────────────────────────────────────

  async fn upsert_authors(&self, names: Vec<String>) -> Result<usize> {
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO authors (author_name) VALUES (?1)
             ON CONFLICT (author_name) DO NOTHING",
          )?;
          for name in &names {
            inserted += stmt.execute(rusqlite::params![name])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(inserted)
  }

  // ── Poems and lines ───────────────────────────────────────────────────────

  async fn insert_poem(&self, poem: NewPoem) -> Result<Outcome<PoemId>> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let outcome = insert_poem_row(&tx, &poem)?;
        if outcome.is_done() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  async fn insert_lines(
    &self,
    poem_id: Option<PoemId>,
    lines: Vec<String>,
  ) -> Result<Outcome<usize>> {
    let Some(poem_id) = poem_id else {
      return Ok(Outcome::Skipped(Skip::NoPoemId));
    };

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = insert_line_rows(&tx, poem_id, &lines)?;
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(Outcome::Done(inserted))
  }

  async fn ingest_poem(&self, record: PoemRecord) -> Result<Outcome<IngestedPoem>> {
    let (poem, lines) = record.into_parts();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let poem_id = match insert_poem_row(&tx, &poem)? {
          Outcome::Done(id) => id,
          Outcome::Skipped(skip) => return Ok(Outcome::Skipped(skip)),
        };
        let lines_inserted = insert_line_rows(&tx, poem_id, &lines)?;
        tx.commit()?;
        Ok(Outcome::Done(IngestedPoem { poem_id, lines_inserted }))
      })
      .await?;

    Ok(outcome)
  }

  // ── Backfill ──────────────────────────────────────────────────────────────

  async fn backfill_titles(&self, clean: Cleaner) -> Result<BackfillReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let titles: Vec<(PoemId, String)> = {
          let mut stmt = tx.prepare("SELECT poem_id, poem_title FROM poems ORDER BY poem_id")?;
          stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?
        };

        let mut report = BackfillReport { scanned: titles.len(), ..Default::default() };
        {
          // OR IGNORE changes nothing when the cleaned title is already
          // taken; that poem is then a duplicate and is dropped with its lines.
          let mut update =
            tx.prepare("UPDATE OR IGNORE poems SET poem_title = ?1 WHERE poem_id = ?2")?;
          let mut delete_lines = tx.prepare("DELETE FROM lines WHERE poem_id = ?1")?;
          let mut delete_poem = tx.prepare("DELETE FROM poems WHERE poem_id = ?1")?;
          for (poem_id, title) in titles {
            let cleaned = clean(&title);
            if cleaned == title {
              continue;
            }
            if update.execute(rusqlite::params![cleaned, poem_id])? == 0 {
              let lines = delete_lines.execute(rusqlite::params![poem_id])?;
              delete_poem.execute(rusqlite::params![poem_id])?;
              tracing::warn!(
                poem_id, %title, %cleaned, lines,
                "cleaned title already in use; duplicate poem dropped"
              );
              report.deleted += 1;
            } else {
              report.updated += 1;
            }
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;

    Ok(report)
  }

  async fn backfill_lines(&self, clean: Cleaner) -> Result<BackfillReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let lines: Vec<(i64, String)> = {
          let mut stmt = tx.prepare("SELECT line_id, line_content FROM lines ORDER BY line_id")?;
          stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?
        };

        let mut report = BackfillReport { scanned: lines.len(), ..Default::default() };
        {
          let mut update = tx.prepare("UPDATE lines SET line_content = ?1 WHERE line_id = ?2")?;
          let mut delete = tx.prepare("DELETE FROM lines WHERE line_id = ?1")?;
          for (line_id, content) in lines {
            let cleaned = clean(&content);
            if cleaned.is_empty() {
              delete.execute(rusqlite::params![line_id])?;
              report.deleted += 1;
            } else if cleaned != content {
              update.execute(rusqlite::params![cleaned, line_id])?;
              report.updated += 1;
            }
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;

    Ok(report)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn counts(&self) -> Result<TableCounts> {
    let counts = self
      .conn
      .call(|conn| {
        Ok(TableCounts {
          authors: count_rows(conn, "SELECT COUNT(*) FROM authors")?,
          poems:   count_rows(conn, "SELECT COUNT(*) FROM poems")?,
          lines:   count_rows(conn, "SELECT COUNT(*) FROM lines")?,
        })
      })
      .await?;

    Ok(counts)
  }

  async fn list_authors(&self) -> Result<Vec<Author>> {
    let authors = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY author_id"))?;
        let rows = stmt.query_map([], rows::author)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(authors)
  }

  async fn poem_by_title(&self, title: String) -> Result<Option<Poem>> {
    let poem = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {POEM_COLUMNS} FROM poems WHERE poem_title = ?1"),
            rusqlite::params![title],
            rows::poem,
          )
          .optional()?)
      })
      .await?;

    Ok(poem)
  }

  async fn lines_for_poem(&self, poem_id: PoemId) -> Result<Vec<Line>> {
    let lines = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LINE_COLUMNS} FROM lines WHERE poem_id = ?1 ORDER BY line_number"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![poem_id], rows::line)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(lines)
  }
}
