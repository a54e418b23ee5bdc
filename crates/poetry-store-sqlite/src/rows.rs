//! Mapping between SQLite rows and the domain row types.

use poetry_core::model::{Author, Line, Poem};
use rusqlite::Row;

pub const AUTHOR_COLUMNS: &str = "author_id, author_name";
pub const POEM_COLUMNS: &str = "poem_id, author_id, poem_title, line_count";
pub const LINE_COLUMNS: &str = "line_id, poem_id, line_number, line_content";

pub fn author(row: &Row<'_>) -> rusqlite::Result<Author> {
  Ok(Author {
    author_id:   row.get(0)?,
    author_name: row.get(1)?,
  })
}

pub fn poem(row: &Row<'_>) -> rusqlite::Result<Poem> {
  Ok(Poem {
    poem_id:    row.get(0)?,
    author_id:  row.get(1)?,
    poem_title: row.get(2)?,
    line_count: row.get(3)?,
  })
}

pub fn line(row: &Row<'_>) -> rusqlite::Result<Line> {
  Ok(Line {
    line_id:      row.get(0)?,
    poem_id:      row.get(1)?,
    line_number:  row.get(2)?,
    line_content: row.get(3)?,
  })
}
