//! The backfill normalizer: re-applies the cleaning rules to stored data.
//!
//! Each pass is one transaction in the store. A pass that fails is rolled
//! back entirely and logged; the other pass still runs.

use poetry_core::{
  model::BackfillReport,
  normalize::{clean_line, clean_title},
  store::PoetryStore,
};
use serde::Serialize;
use tracing::{info, warn};

/// Result of both passes; `None` marks a pass that was rolled back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillSummary {
  pub titles: Option<BackfillReport>,
  pub lines:  Option<BackfillReport>,
}

/// Clean stored titles, then stored lines.
pub async fn run<S: PoetryStore>(store: &S) -> BackfillSummary {
  let titles = match store.backfill_titles(clean_title).await {
    Ok(report) => {
      info!(
        scanned = report.scanned,
        updated = report.updated,
        deleted = report.deleted,
        "poem titles cleaned"
      );
      Some(report)
    }
    Err(e) => {
      warn!(error = %e, "title backfill rolled back");
      None
    }
  };

  let lines = match store.backfill_lines(clean_line).await {
    Ok(report) => {
      info!(
        scanned = report.scanned,
        updated = report.updated,
        deleted = report.deleted,
        "poem lines cleaned"
      );
      Some(report)
    }
    Err(e) => {
      warn!(error = %e, "line backfill rolled back");
      None
    }
  };

  BackfillSummary { titles, lines }
}
