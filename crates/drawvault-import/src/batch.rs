//! Batch import driver.
//!
//! Feeds adapter output through the store's reconcile policy one record at
//! a time. Each record commits (or fails) on its own: a bad record or a
//! store error is logged and counted, and the batch moves on. A batch is
//! deliberately not atomic — partial progress survives a mid-batch crash,
//! and a re-run is idempotent thanks to the (lottery_type, draw_number)
//! dedup key.

use std::{fmt, path::Path};

use tracing::{Instrument as _, debug, info, info_span, warn};
use uuid::Uuid;

use drawvault_core::{
  draw::NewDraw,
  store::{DrawStore, ReconcileOutcome},
};

use crate::{Result, ocr, scrape, sheet};

// ─── Report ──────────────────────────────────────────────────────────────────

/// Per-outcome counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
  pub created:   usize,
  pub updated:   usize,
  pub unchanged: usize,
  pub skipped:   usize,
  pub errors:    usize,
}

impl BatchReport {
  pub fn total(&self) -> usize {
    self.created + self.updated + self.unchanged + self.skipped + self.errors
  }
}

impl fmt::Display for BatchReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} records: {} created, {} updated, {} unchanged, {} skipped, {} errors",
      self.total(),
      self.created,
      self.updated,
      self.unchanged,
      self.skipped,
      self.errors
    )
  }
}

// ─── Runner ──────────────────────────────────────────────────────────────────

/// Reconcile a batch of adapted records against the store.
///
/// `source` is a human-readable label for the logs ("ocr:results.json",
/// "sheet:history.csv", ...). Never fails: every per-record problem ends up
/// in the report instead.
pub async fn run_batch<S: DrawStore>(
  store: &S,
  source: &str,
  records: Vec<Result<NewDraw>>,
) -> BatchReport {
  let batch_id = Uuid::new_v4();
  let span = info_span!("import_batch", %batch_id, source);

  async move {
    let mut report = BatchReport::default();

    for (index, record) in records.into_iter().enumerate() {
      let draw = match record {
        Ok(draw) => draw,
        Err(e) => {
          warn!(index, error = %e, "record failed to adapt; continuing");
          report.errors += 1;
          continue;
        }
      };

      let key = format!("{} {}", draw.lottery_type, draw.draw_number);
      match store.reconcile(draw).await {
        Ok(ReconcileOutcome::Created) => {
          info!(%key, "created");
          report.created += 1;
        }
        Ok(ReconcileOutcome::Updated { fields }) => {
          info!(%key, ?fields, "updated with better data");
          report.updated += 1;
        }
        Ok(ReconcileOutcome::Unchanged) => {
          debug!(%key, "already stored; nothing better");
          report.unchanged += 1;
        }
        Ok(ReconcileOutcome::Skipped { reason }) => {
          warn!(%key, %reason, "skipped");
          report.skipped += 1;
        }
        Err(e) => {
          warn!(%key, error = %e, "store error; continuing");
          report.errors += 1;
        }
      }
    }

    info!(
      created = report.created,
      updated = report.updated,
      unchanged = report.unchanged,
      skipped = report.skipped,
      errors = report.errors,
      "batch finished"
    );
    report
  }
  .instrument(span)
  .await
}

// ─── File-level entry points ─────────────────────────────────────────────────

/// Import an OCR capture document.
pub async fn import_ocr_file<S: DrawStore>(
  store: &S,
  path: impl AsRef<Path>,
) -> Result<BatchReport> {
  let path = path.as_ref();
  let capture = ocr::read_ocr_file(path)?;
  let source = format!("ocr:{}", path.display());
  Ok(run_batch(store, &source, capture.into_draws()).await)
}

/// Import a CSV sheet export.
pub async fn import_sheet_file<S: DrawStore>(
  store: &S,
  path: impl AsRef<Path>,
) -> Result<BatchReport> {
  let path = path.as_ref();
  let records = sheet::read_sheet(path)?;
  let source = format!("sheet:{}", path.display());
  Ok(run_batch(store, &source, records).await)
}

/// Import a scrape bundle.
pub async fn import_scrape_file<S: DrawStore>(
  store: &S,
  path: impl AsRef<Path>,
) -> Result<BatchReport> {
  let path = path.as_ref();
  let bundle = scrape::read_scrape_file(path)?;
  let source = format!("scrape:{}", path.display());
  Ok(run_batch(store, &source, bundle.into_draws()).await)
}

#[cfg(test)]
mod tests {
  use super::*;
  use drawvault_core::store::DrawQuery;
  use drawvault_store_sqlite::SqliteStore;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory().await.expect("in-memory store")
  }

  fn sheet_records(csv_text: &str) -> Vec<Result<NewDraw>> {
    let mut reader =
      csv::ReaderBuilder::new().flexible(true).from_reader(csv_text.as_bytes());
    crate::sheet::parse_sheet(&mut reader).unwrap()
  }

  const SHEET: &str = "Game Name,Draw Number,Draw Date,Winning Numbers,Bonus Ball\n\
     Lotto,2530,2025-05-14,\"5, 12, 19, 33, 40, 51\",7\n\
     Powerball,1631,2025-05-14,\"14, 19, 37, 44, 48\",17\n";

  #[tokio::test]
  async fn sheet_batch_creates_rows() {
    let s = store().await;
    let report = run_batch(&s, "sheet:test", sheet_records(SHEET)).await;

    assert_eq!(report.created, 2);
    assert_eq!(report.errors, 0);
    assert_eq!(s.list_draws(&DrawQuery::default()).await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn importing_the_same_sheet_twice_is_idempotent() {
    let s = store().await;
    run_batch(&s, "sheet:test", sheet_records(SHEET)).await;
    let second = run_batch(&s, "sheet:test", sheet_records(SHEET)).await;

    assert_eq!(second.created, 0);
    assert_eq!(second.unchanged, 2);
    assert_eq!(s.list_draws(&DrawQuery::default()).await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn bad_records_are_counted_not_fatal() {
    let s = store().await;
    let records = sheet_records(
      "Game Name,Draw Number,Draw Date,Winning Numbers\n\
       Lotto,2530,not a date,\"1, 2, 3\"\n\
       Lotto,2531,2025-05-17,\"0, 0, 0\"\n\
       Lotto,2532,2025-05-21,\"4, 5, 6\"\n",
    );
    let report = run_batch(&s, "sheet:test", records).await;

    assert_eq!(report.errors, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.created, 1);
    assert_eq!(s.list_draws(&DrawQuery::default()).await.unwrap().len(), 1);
  }
}
