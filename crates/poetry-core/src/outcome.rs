//! The result of a unit of work that may legitimately be skipped.
//!
//! Fallible operations return `Result<Outcome<T>, E>`: `Ok(Done(_))` on
//! success, `Ok(Skipped(_))` when there is nothing to do for this unit (bad
//! payload, unknown author, already ingested), and `Err(_)` when something
//! actually failed. Callers skip the unit in both of the latter cases but log
//! them differently.

use std::fmt;

/// Either a value, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
  Done(T),
  Skipped(Skip),
}

impl<T> Outcome<T> {
  pub fn is_done(&self) -> bool { matches!(self, Self::Done(_)) }

  /// The value, discarding the skip reason.
  pub fn done(self) -> Option<T> {
    match self {
      Self::Done(v) => Some(v),
      Self::Skipped(_) => None,
    }
  }
}

/// Why a unit of work produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
  /// A required field is absent from a fetched record.
  MissingField(&'static str),
  /// A field is present but has the wrong type.
  InvalidField(&'static str),
  /// The payload is not a single-element array.
  UnexpectedShape(String),
  /// The poem names an author that is not in the store.
  AuthorNotFound(String),
  /// A poem with this title is already stored.
  DuplicateTitle(String),
  /// Lines were offered without a poem to attach them to.
  NoPoemId,
}

impl fmt::Display for Skip {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::MissingField(field) => write!(f, "missing required field `{field}`"),
      Self::InvalidField(field) => write!(f, "field `{field}` has an unexpected type"),
      Self::UnexpectedShape(what) => write!(f, "unexpected payload shape: {what}"),
      Self::AuthorNotFound(name) => write!(f, "author not found: {name}"),
      Self::DuplicateTitle(title) => write!(f, "poem already exists: {title}"),
      Self::NoPoemId => f.write_str("no poem id"),
    }
  }
}
