//! AI/OCR extraction records.
//!
//! The extraction service hands back one JSON document per captured
//! results screenshot: capture-level provenance plus a list of per-game
//! extractions. The adapter normalizes each extraction into a
//! [`NewDraw`]; low-confidence extractions are rejected here, before they
//! can pollute the store.

use std::{fs::File, io::BufReader, path::Path};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use drawvault_core::{
  draw::{NewDraw, Provenance},
  normalize::normalize_lottery_type,
  parse::parse_draw_date,
};

use crate::{Error, Result};

/// Extractions below this confidence are noise more often than data.
pub const MIN_CONFIDENCE: u8 = 50;

// ─── Wire shapes ─────────────────────────────────────────────────────────────

/// One game's result as extracted from a screenshot.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrExtraction {
  pub lottery_type: String,
  pub draw_number:  String,
  /// ISO date string; the extraction prompt asks for ISO but models drift,
  /// so parsing stays tolerant.
  pub draw_date:    String,
  #[serde(default)]
  pub main_numbers: Vec<u32>,
  #[serde(default)]
  pub bonus_number: Option<u32>,
  /// 0–100 self-reported extraction confidence.
  #[serde(default)]
  pub confidence:   Option<u8>,
}

/// A whole capture document: provenance plus the extractions.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrCapture {
  #[serde(default)]
  pub provider:   Option<String>,
  #[serde(default)]
  pub model:      Option<String>,
  #[serde(default)]
  pub timestamp:  Option<DateTime<Utc>>,
  #[serde(default)]
  pub source_url: Option<String>,
  pub results:    Vec<OcrExtraction>,
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

impl OcrExtraction {
  /// Normalize into the canonical incoming record.
  pub fn into_draw(self, provenance: &Provenance) -> Result<NewDraw> {
    if let Some(confidence) = self.confidence
      && confidence < MIN_CONFIDENCE
    {
      return Err(Error::BadRecord(format!(
        "extraction confidence {confidence} below floor {MIN_CONFIDENCE}"
      )));
    }

    let lottery_type = normalize_lottery_type(&self.lottery_type);
    let draw_date = parse_draw_date(&self.draw_date).ok_or_else(|| {
      drawvault_core::Error::BadDrawDate(self.draw_date.clone())
    })?;

    let mut draw = NewDraw::new(lottery_type, self.draw_number, draw_date);
    draw.numbers = self.main_numbers;
    draw.bonus_numbers = self.bonus_number.into_iter().collect();
    draw.provenance = provenance.clone();
    Ok(draw)
  }
}

impl OcrCapture {
  pub fn provenance(&self) -> Provenance {
    Provenance {
      source_url:    self.source_url.clone(),
      ocr_provider:  self.provider.clone(),
      ocr_model:     self.model.clone(),
      ocr_timestamp: self.timestamp,
    }
  }

  /// Adapt every extraction; per-record failures stay in the list so the
  /// batch runner can count them without losing the rest.
  pub fn into_draws(self) -> Vec<Result<NewDraw>> {
    let provenance = self.provenance();
    self
      .results
      .into_iter()
      .map(|extraction| extraction.into_draw(&provenance))
      .collect()
  }
}

/// Read a capture document from disk.
pub fn read_ocr_file(path: impl AsRef<Path>) -> Result<OcrCapture> {
  let file = File::open(path)?;
  Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use drawvault_core::draw::LotteryType;

  fn capture(json: &str) -> OcrCapture {
    serde_json::from_str(json).unwrap()
  }

  #[test]
  fn capture_document_adapts_to_draws() {
    let cap = capture(
      r#"{
        "provider": "anthropic",
        "model": "example-model",
        "source_url": "https://www.nationallottery.co.za/results",
        "results": [{
          "lottery_type": "POWERBALL PLUS",
          "draw_number": "Draw 1631",
          "draw_date": "2025-05-14",
          "main_numbers": [14, 19, 37, 44, 48],
          "bonus_number": 17,
          "confidence": 92
        }]
      }"#,
    );

    let draws = cap.into_draws();
    assert_eq!(draws.len(), 1);
    let draw = draws.into_iter().next().unwrap().unwrap();
    assert_eq!(draw.lottery_type, LotteryType::PowerballPlus);
    assert_eq!(draw.draw_number, "Draw 1631");
    assert_eq!(draw.numbers, vec![14, 19, 37, 44, 48]);
    assert_eq!(draw.bonus_numbers, vec![17]);
    assert_eq!(draw.provenance.ocr_provider.as_deref(), Some("anthropic"));
  }

  #[test]
  fn low_confidence_extraction_is_rejected() {
    let cap = capture(
      r#"{
        "results": [{
          "lottery_type": "Lotto",
          "draw_number": "2530",
          "draw_date": "2025-05-14",
          "main_numbers": [1, 2, 3, 4, 5, 6],
          "confidence": 20
        }]
      }"#,
    );

    let draws = cap.into_draws();
    assert!(draws[0].is_err());
  }

  #[test]
  fn unparseable_date_is_a_record_error_not_a_panic() {
    let cap = capture(
      r#"{
        "results": [{
          "lottery_type": "Lotto",
          "draw_number": "2530",
          "draw_date": "sometime last week",
          "main_numbers": [1, 2, 3, 4, 5, 6]
        }]
      }"#,
    );

    assert!(cap.into_draws()[0].is_err());
  }
}
