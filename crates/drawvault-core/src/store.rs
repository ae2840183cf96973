//! The `DrawStore` trait and supporting query/outcome types.
//!
//! The trait is implemented by storage backends (e.g.
//! `drawvault-store-sqlite`). Import paths and the CLI depend on this
//! abstraction, not on any concrete backend.

use std::{fmt, future::Future};

use chrono::NaiveDate;

use crate::draw::{DrawResult, LotteryType, NewDraw};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Why an incoming record was skipped without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// The draw identifier normalized to nothing usable.
  MissingDrawNumber,
  /// The numbers array was present but all-zero — a failed extraction.
  AllZeroNumbers,
  /// No existing row to update, and no valid numbers to create one with.
  MissingNumbers,
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::MissingDrawNumber => "missing draw number",
      Self::AllZeroNumbers => "all-zero numbers",
      Self::MissingNumbers => "no valid numbers for a new row",
    };
    f.write_str(s)
  }
}

/// What the reconcile policy did with an incoming record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
  /// No existing row matched; a new one was inserted.
  Created,
  /// An existing row matched and at least one field was judged better.
  Updated {
    /// Column names that were replaced, for logging and audit.
    fields: Vec<&'static str>,
  },
  /// An existing row matched and nothing incoming was better.
  Unchanged,
  /// The record failed validation and was dropped.
  Skipped { reason: SkipReason },
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`DrawStore::list_draws`].
#[derive(Debug, Clone, Default)]
pub struct DrawQuery {
  pub lottery_type: Option<LotteryType>,
  /// Inclusive lower bound on `draw_date`.
  pub since:        Option<NaiveDate>,
  /// Inclusive upper bound on `draw_date`.
  pub until:        Option<NaiveDate>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a draw-results store backend.
///
/// `reconcile` is the only write path: it decides per record whether the
/// incoming data is new, a duplicate, or a better-quality update, and
/// applies the whole decision atomically.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait DrawStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Reconcile one normalized incoming record against the store.
  fn reconcile(
    &self,
    incoming: NewDraw,
  ) -> impl Future<Output = Result<ReconcileOutcome, Self::Error>> + Send + '_;

  /// Exact lookup by the dedup key. Returns `None` if not found.
  fn get_draw<'a>(
    &'a self,
    lottery_type: LotteryType,
    draw_number: &'a str,
  ) -> impl Future<Output = Result<Option<DrawResult>, Self::Error>> + Send + 'a;

  /// List stored draws matching `query`, newest draw date first.
  fn list_draws<'a>(
    &'a self,
    query: &'a DrawQuery,
  ) -> impl Future<Output = Result<Vec<DrawResult>, Self::Error>> + Send + 'a;

  /// The most recent stored draw for a game, by draw date.
  fn latest_draw(
    &self,
    lottery_type: LotteryType,
  ) -> impl Future<Output = Result<Option<DrawResult>, Self::Error>> + Send + '_;
}
