//! Ingestion of PoetryDB poems into a [`PoetryStore`].
//!
//! The pipeline is strictly sequential: fetch authors and store them, fetch
//! the title list, then fetch and store each poem in turn. Afterwards the
//! backfill normalizer cleans stored titles and lines in place.
//!
//! [`PoetryStore`]: poetry_core::store::PoetryStore

pub mod backfill;
pub mod client;
pub mod driver;
pub mod error;
pub mod settings;

pub use client::PoetryDbClient;
pub use driver::{IngestReport, Ingestor, RunOptions};
pub use error::{ClientError, IngestError};
pub use settings::{ApiConfig, IngestConfig};
