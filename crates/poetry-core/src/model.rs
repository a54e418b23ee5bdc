//! Stored rows and the inputs used to create them.
//!
//! Authors and poems are keyed by natural keys (`author_name`, `poem_title`)
//! in addition to their generated identifiers. Lines are only ever created in
//! bulk alongside their poem.

use serde::{Deserialize, Serialize};

pub type AuthorId = i64;
pub type PoemId = i64;
pub type LineId = i64;

// ─── Stored rows ─────────────────────────────────────────────────────────────

/// A row of the `authors` table. Never mutated or deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  pub author_id:   AuthorId,
  pub author_name: String,
}

/// A row of the `poems` table.
///
/// `poem_title` is globally unique and may be rewritten by the title backfill
/// pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
  pub poem_id:    PoemId,
  pub author_id:  AuthorId,
  pub poem_title: String,
  /// Line count as reported by the source, not recomputed from `lines`.
  pub line_count: i64,
}

/// A row of the `lines` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
  pub line_id:      LineId,
  pub poem_id:      PoemId,
  /// 1-based position within the poem at insertion time.
  pub line_number:  i64,
  pub line_content: String,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::PoetryStore::insert_poem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPoem {
  /// Natural key of an existing author.
  pub author:     String,
  pub title:      String,
  pub line_count: i64,
}

/// A validated poem fetched from the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemRecord {
  pub author:     String,
  pub title:      String,
  pub line_count: i64,
  pub lines:      Vec<String>,
}

impl PoemRecord {
  /// Split into the poem row input and its line contents.
  pub fn into_parts(self) -> (NewPoem, Vec<String>) {
    let poem = NewPoem {
      author:     self.author,
      title:      self.title,
      line_count: self.line_count,
    };
    (poem, self.lines)
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// A poem written together with its lines in a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestedPoem {
  pub poem_id:        PoemId,
  pub lines_inserted: usize,
}

/// Row counts of the three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
  pub authors: u64,
  pub poems:   u64,
  pub lines:   u64,
}

/// What a single backfill pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
  /// Rows read.
  pub scanned: usize,
  /// Rows whose stored value was replaced by its cleaned form.
  pub updated: usize,
  /// Rows removed: lines that cleaned to nothing, or poems whose cleaned
  /// title is already taken by another poem.
  pub deleted: usize,
}
