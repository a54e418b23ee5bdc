//! Error types for `poetry-ingest`.

use reqwest::StatusCode;
use thiserror::Error;

/// A failed request to the remote API.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  /// Transport failure or an undecodable body.
  #[error("GET {path} failed: {source}")]
  Http {
    path:   String,
    #[source]
    source: reqwest::Error,
  },

  #[error("GET {path} → {status}")]
  Status { path: String, status: StatusCode },
}

/// A failure that ends an ingestion run.
///
/// Per-poem failures never surface here; they are logged and counted in the
/// run report instead.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error("failed to fetch authors: {0}")]
  Authors(#[source] ClientError),

  #[error("failed to fetch titles: {0}")]
  Titles(#[source] ClientError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IngestError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}
