//! Draw types — the fundamental unit of the Drawvault store.
//!
//! A draw result is keyed by (canonical lottery type, normalized draw
//! number). Records from every source (OCR extraction, spreadsheet import,
//! page scrape) are normalized into a [`NewDraw`] before they reach the
//! reconcile policy; the stored row is a [`DrawResult`].

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Lottery type ────────────────────────────────────────────────────────────

/// The six canonical game variants. The canonical vocabulary is the
/// "Lottery" family; legacy "Lotto" strings are accepted on decode but never
/// written back.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LotteryType {
  Lottery,
  LotteryPlus1,
  LotteryPlus2,
  Powerball,
  PowerballPlus,
  DailyLottery,
}

impl LotteryType {
  pub const ALL: [LotteryType; 6] = [
    Self::Lottery,
    Self::LotteryPlus1,
    Self::LotteryPlus2,
    Self::Powerball,
    Self::PowerballPlus,
    Self::DailyLottery,
  ];

  /// The canonical name stored in the `lottery_type` column and shown to
  /// users.
  pub fn canonical_name(self) -> &'static str {
    match self {
      Self::Lottery => "Lottery",
      Self::LotteryPlus1 => "Lottery Plus 1",
      Self::LotteryPlus2 => "Lottery Plus 2",
      Self::Powerball => "Powerball",
      Self::PowerballPlus => "Powerball Plus",
      Self::DailyLottery => "Daily Lottery",
    }
  }

  /// First word of the canonical name; the fuzzy-lookup fallback matches on
  /// this prefix.
  pub fn family_prefix(self) -> &'static str {
    match self {
      Self::Lottery | Self::LotteryPlus1 | Self::LotteryPlus2 => "Lottery",
      Self::Powerball | Self::PowerballPlus => "Powerball",
      Self::DailyLottery => "Daily",
    }
  }

  /// Strict decode from a stored canonical name. Accepts the legacy "Lotto"
  /// aliases written by earlier import paths.
  pub fn from_canonical(s: &str) -> Result<Self> {
    match s {
      "Lottery" | "Lotto" => Ok(Self::Lottery),
      "Lottery Plus 1" | "Lotto Plus 1" => Ok(Self::LotteryPlus1),
      "Lottery Plus 2" | "Lotto Plus 2" => Ok(Self::LotteryPlus2),
      "Powerball" => Ok(Self::Powerball),
      "Powerball Plus" => Ok(Self::PowerballPlus),
      "Daily Lottery" | "Daily Lotto" => Ok(Self::DailyLottery),
      other => Err(Error::UnknownLotteryType(other.to_owned())),
    }
  }
}

impl fmt::Display for LotteryType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.canonical_name())
  }
}

// ─── Divisions ───────────────────────────────────────────────────────────────

/// One prize tier: how many winners and the payout string as published.
/// The prize keeps its formatting because formatting is itself compared when
/// deciding whether incoming data is better (see [`crate::quality`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionEntry {
  pub winners: u32,
  pub prize:   String,
}

/// Division number → entry. Division 1 is the jackpot.
pub type Divisions = BTreeMap<u8, DivisionEntry>;

// ─── Provenance ──────────────────────────────────────────────────────────────

/// Where a stored row's data came from. Fields are filled once and only
/// overwritten when the stored value is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
  pub source_url:    Option<String>,
  pub ocr_provider:  Option<String>,
  pub ocr_model:     Option<String>,
  pub ocr_timestamp: Option<DateTime<Utc>>,
}

// ─── DrawResult ──────────────────────────────────────────────────────────────

/// A stored draw result. At most one exists per
/// (lottery_type, draw_number); the store enforces this with a UNIQUE
/// constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResult {
  pub lottery_type:  LotteryType,
  pub draw_number:   String,
  pub draw_date:     NaiveDate,
  /// Main winning numbers, in drawn order. Valid only if at least one value
  /// is non-zero.
  pub numbers:       Vec<u32>,
  /// Bonus/Powerball numbers; empty for games without one.
  pub bonus_numbers: Vec<u32>,
  pub divisions:     Divisions,
  pub provenance:    Provenance,
  /// Server-assigned creation timestamp; never changes.
  pub recorded_at:   DateTime<Utc>,
  /// Bumped whenever the merge policy replaces a field.
  pub updated_at:    DateTime<Utc>,
}

// ─── NewDraw ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::DrawStore::reconcile`] — a fully normalized
/// incoming record. Timestamps are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDraw {
  pub lottery_type:  LotteryType,
  pub draw_number:   String,
  pub draw_date:     NaiveDate,
  pub numbers:       Vec<u32>,
  pub bonus_numbers: Vec<u32>,
  pub divisions:     Divisions,
  pub provenance:    Provenance,
}

impl NewDraw {
  /// Convenience constructor with all data fields empty.
  pub fn new(
    lottery_type: LotteryType,
    draw_number: impl Into<String>,
    draw_date: NaiveDate,
  ) -> Self {
    Self {
      lottery_type,
      draw_number: draw_number.into(),
      draw_date,
      numbers: Vec::new(),
      bonus_numbers: Vec::new(),
      divisions: Divisions::new(),
      provenance: Provenance::default(),
    }
  }
}
