//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, draw dates ISO 8601 dates. Numbers and
//! divisions are JSON text. Decoding is deliberately tolerant: historical
//! rows carry divisions as `NULL`, `{}`, `null`, or a legacy list-of-objects
//! shape, and winner counts as either ints or digit strings.

use chrono::{DateTime, NaiveDate, Utc};
use drawvault_core::{
  draw::{DivisionEntry, Divisions, DrawResult, LotteryType, Provenance},
  parse::{division_label, format_prize, parse_division_label, parse_draw_date, parse_winners},
};
use serde_json::Value;

use crate::{Error, Result};

// ─── Dates and timestamps ────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  // Tolerates the odd legacy row written in a non-ISO source format.
  parse_draw_date(s).ok_or_else(|| Error::DateParse(s.to_owned()))
}

// ─── Numbers ─────────────────────────────────────────────────────────────────

pub fn encode_numbers(numbers: &[u32]) -> Result<String> {
  Ok(serde_json::to_string(numbers)?)
}

/// Decode a JSON numbers column. `NULL`, empty, and `null` all mean "no
/// numbers"; array items may be ints or digit strings.
pub fn decode_numbers(raw: Option<&str>) -> Result<Vec<u32>> {
  let Some(raw) = raw else {
    return Ok(Vec::new());
  };
  let raw = raw.trim();
  if raw.is_empty() || raw == "null" {
    return Ok(Vec::new());
  }

  let value: Value = serde_json::from_str(raw)?;
  let Value::Array(items) = value else {
    return Ok(Vec::new());
  };
  Ok(
    items
      .iter()
      .filter_map(|v| match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
      })
      .collect(),
  )
}

// ─── Divisions ───────────────────────────────────────────────────────────────

pub fn encode_divisions(divisions: &Divisions) -> Result<String> {
  let map: serde_json::Map<String, Value> = divisions
    .iter()
    .map(|(division, entry)| {
      (
        division_label(*division),
        serde_json::json!({ "winners": entry.winners, "prize": entry.prize }),
      )
    })
    .collect();
  Ok(Value::Object(map).to_string())
}

/// Decode a divisions column, tolerating every shape that has ever been
/// written to it.
pub fn decode_divisions(raw: Option<&str>) -> Result<Divisions> {
  let Some(raw) = raw else {
    return Ok(Divisions::new());
  };
  let raw = raw.trim();
  if raw.is_empty() || raw == "null" {
    return Ok(Divisions::new());
  }

  let value: Value = serde_json::from_str(raw)?;
  Ok(divisions_from_value(&value))
}

fn divisions_from_value(value: &Value) -> Divisions {
  let mut out = Divisions::new();
  match value {
    Value::Object(map) => {
      for (label, entry) in map {
        if let Some(division) = parse_division_label(label) {
          out.insert(division, entry_from_value(entry));
        }
      }
    }
    // Legacy shape: a list of {division, winners, prize} objects, division
    // either labelled or implied by position.
    Value::Array(items) => {
      for (i, item) in items.iter().enumerate() {
        if !item.is_object() {
          continue;
        }
        let division = item
          .get("division")
          .and_then(|d| match d {
            Value::String(s) => parse_division_label(s),
            Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
            _ => None,
          })
          .or_else(|| u8::try_from(i + 1).ok());
        if let Some(division) = division {
          out.insert(division, entry_from_value(item));
        }
      }
    }
    _ => {}
  }
  out
}

fn entry_from_value(value: &Value) -> DivisionEntry {
  let winners = match value.get("winners") {
    Some(Value::Number(n)) => u32::try_from(n.as_u64().unwrap_or(0)).unwrap_or(0),
    Some(Value::String(s)) => parse_winners(s),
    _ => 0,
  };
  let prize = match value.get("prize") {
    Some(Value::String(s)) => s.clone(),
    Some(Value::Number(n)) => format_prize(&n.to_string()),
    _ => String::new(),
  };
  DivisionEntry { winners, prize }
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read directly from a `draw_results` row.
pub struct RawDrawRow {
  pub id:            i64,
  pub lottery_type:  String,
  pub draw_number:   String,
  pub draw_date:     String,
  pub numbers:       Option<String>,
  pub bonus_numbers: Option<String>,
  pub divisions:     Option<String>,
  pub source_url:    Option<String>,
  pub ocr_provider:  Option<String>,
  pub ocr_model:     Option<String>,
  pub ocr_timestamp: Option<String>,
  pub recorded_at:   String,
  pub updated_at:    String,
}

impl RawDrawRow {
  /// Cheap check on the raw column text, used when the fuzzy lookup prefers
  /// a candidate that already has division data.
  pub fn has_division_data(&self) -> bool {
    match self.divisions.as_deref().map(str::trim) {
      None | Some("") | Some("{}") | Some("null") | Some("[]") => false,
      Some(_) => true,
    }
  }

  pub fn into_draw(self) -> Result<DrawResult> {
    let lottery_type =
      LotteryType::from_canonical(&self.lottery_type).map_err(Error::Core)?;
    Ok(DrawResult {
      lottery_type,
      draw_number: self.draw_number,
      draw_date: decode_date(&self.draw_date)?,
      numbers: decode_numbers(self.numbers.as_deref())?,
      bonus_numbers: decode_numbers(self.bonus_numbers.as_deref())?,
      divisions: decode_divisions(self.divisions.as_deref())?,
      provenance: Provenance {
        source_url:    self.source_url,
        ocr_provider:  self.ocr_provider,
        ocr_model:     self.ocr_model,
        ocr_timestamp: self
          .ocr_timestamp
          .as_deref()
          .map(decode_dt)
          .transpose()?,
      },
      recorded_at: decode_dt(&self.recorded_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
