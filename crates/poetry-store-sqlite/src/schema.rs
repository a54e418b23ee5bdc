//! SQL schema for the poetry SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS authors (
    author_id   INTEGER PRIMARY KEY,
    author_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS poems (
    poem_id     INTEGER PRIMARY KEY,
    author_id   INTEGER NOT NULL REFERENCES authors(author_id),
    poem_title  TEXT NOT NULL UNIQUE,   -- rewritten in place by the title backfill
    line_count  INTEGER NOT NULL        -- as reported by the source
);

-- Lines may be rewritten or deleted by the line backfill.
CREATE TABLE IF NOT EXISTS lines (
    line_id      INTEGER PRIMARY KEY,
    poem_id      INTEGER NOT NULL REFERENCES poems(poem_id),
    line_number  INTEGER NOT NULL,      -- 1-based
    line_content TEXT NOT NULL,
    UNIQUE (poem_id, line_number)
);

CREATE INDEX IF NOT EXISTS poems_author_idx ON poems(author_id);

PRAGMA user_version = 1;
";
