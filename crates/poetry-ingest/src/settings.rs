//! Runtime configuration.
//!
//! Values come from an optional TOML file, overridden by `POETRY_*`
//! environment variables (`POETRY_API__BASE_URL`, `POETRY_STORE__PATH`, ...).
//! The resulting struct is passed explicitly to the client and store
//! constructors.

use std::path::Path;

use poetry_store_sqlite::StoreConfig;
use serde::Deserialize;

/// Remote API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url:     String,
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url:     "https://poetrydb.org".to_string(),
      timeout_secs: 30,
    }
  }
}

/// Everything an ingestion run needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
  pub api:   ApiConfig,
  pub store: StoreConfig,
}

impl IngestConfig {
  /// Load from `path` (if given) and the environment.
  pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder = builder.add_source(config::File::from(path));
    }
    builder
      .add_source(
        config::Environment::with_prefix("POETRY")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }
}
