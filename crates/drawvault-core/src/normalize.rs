//! Free-text normalizers for game names and draw identifiers.
//!
//! Every import path runs its raw strings through these before lookup, so
//! the (lottery_type, draw_number) dedup key is computed the same way no
//! matter where a record came from.

use crate::draw::LotteryType;

// ─── Lottery type ────────────────────────────────────────────────────────────

/// Map a free-text game name to its canonical [`LotteryType`].
///
/// Substring match in priority order; there is no error path — anything
/// unrecognized falls through to the base game. Idempotent over canonical
/// names.
pub fn normalize_lottery_type(raw: &str) -> LotteryType {
  let s = raw.trim().to_lowercase();
  if s.contains("powerball") {
    if s.contains("plus") {
      LotteryType::PowerballPlus
    } else {
      LotteryType::Powerball
    }
  } else if s.contains("daily") {
    LotteryType::DailyLottery
  } else if s.contains("plus 1") || s.contains("plus1") {
    LotteryType::LotteryPlus1
  } else if s.contains("plus 2") || s.contains("plus2") {
    LotteryType::LotteryPlus2
  } else {
    LotteryType::Lottery
  }
}

// ─── Draw number ─────────────────────────────────────────────────────────────

/// Textual prefixes seen around draw identifiers, longest variants first so
/// shorter ones don't leave fragments behind. Removal is unanchored
/// substring replacement — a prefix occurring mid-string is stripped too.
const DRAW_PREFIXES: &[&str] = &[
  "LOTTERY PLUS 1 DRAW",
  "LOTTERY PLUS 2 DRAW",
  "LOTTO PLUS 1 DRAW",
  "LOTTO PLUS 2 DRAW",
  "POWERBALL PLUS DRAW",
  "DAILY LOTTERY DRAW",
  "DAILY LOTTO DRAW",
  "LOTTERY DRAW",
  "LOTTO DRAW",
  "POWERBALL DRAW",
  "DRAW NUMBER",
  "POWERBALL",
  "LOTTERY",
  "LOTTO",
  "DRAW",
];

/// Reduce a raw draw identifier to its numeric core.
///
/// Upper-cases, strips known prefixes, then takes the first run of ASCII
/// digits. Input with no digits at all comes back as a cleaned best-effort
/// string; empty input is `None`. Never panics.
pub fn normalize_draw_number(raw: &str) -> Option<String> {
  let mut s = raw.trim().to_uppercase();
  if s.is_empty() {
    return None;
  }

  for prefix in DRAW_PREFIXES {
    if s.contains(prefix) {
      s = s.replace(prefix, " ");
    }
  }

  let digits: String = s
    .chars()
    .skip_while(|c| !c.is_ascii_digit())
    .take_while(|c| c.is_ascii_digit())
    .collect();
  if !digits.is_empty() {
    return Some(digits);
  }

  let cleaned = s
    .trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '#')
    .to_owned();
  if cleaned.is_empty() { None } else { Some(cleaned) }
}
