//! Scraped-page records.
//!
//! The scrapers run regex extraction over results-page text and emit JSON
//! bundles of loosely-typed strings; everything here is re-parsed through
//! the shared normalizers before it becomes a canonical record.

use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use drawvault_core::{
  draw::{DivisionEntry, NewDraw, Provenance},
  normalize::normalize_lottery_type,
  parse::{format_prize, parse_division_label, parse_draw_date, parse_winners},
};

use crate::Result;

// ─── Wire shapes ─────────────────────────────────────────────────────────────

/// One prize tier as pulled from page text. All strings; the page doesn't
/// do types.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedDivision {
  pub division: String,
  #[serde(default)]
  pub winners:  String,
  #[serde(default)]
  pub prize:    String,
}

/// One draw as pulled from a results page.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedDraw {
  pub lottery_type:    String,
  #[serde(default)]
  pub main_numbers:    Vec<u32>,
  #[serde(default)]
  pub bonus_numbers:   Vec<u32>,
  pub draw_date:       String,
  pub draw_number:     String,
  #[serde(default)]
  pub prize_divisions: Vec<ScrapedDivision>,
}

/// A scrape run: the page URL plus everything extracted from it.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeBundle {
  #[serde(default)]
  pub source_url: Option<String>,
  pub results:    Vec<ScrapedDraw>,
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

impl ScrapedDraw {
  pub fn into_draw(self, source_url: Option<&str>) -> Result<NewDraw> {
    let draw_date = parse_draw_date(&self.draw_date).ok_or_else(|| {
      drawvault_core::Error::BadDrawDate(self.draw_date.clone())
    })?;

    let mut draw = NewDraw::new(
      normalize_lottery_type(&self.lottery_type),
      self.draw_number,
      draw_date,
    );
    draw.numbers = self.main_numbers;
    draw.bonus_numbers = self.bonus_numbers;
    draw.provenance = Provenance {
      source_url: source_url.map(str::to_owned),
      ..Provenance::default()
    };

    for scraped in self.prize_divisions {
      // Tiers whose label yields no division number are regex misfires.
      let Some(division) = parse_division_label(&scraped.division) else {
        continue;
      };
      draw.divisions.insert(division, DivisionEntry {
        winners: parse_winners(&scraped.winners),
        prize:   format_prize(&scraped.prize),
      });
    }
    Ok(draw)
  }
}

impl ScrapeBundle {
  pub fn into_draws(self) -> Vec<Result<NewDraw>> {
    let source_url = self.source_url;
    self
      .results
      .into_iter()
      .map(|scraped| scraped.into_draw(source_url.as_deref()))
      .collect()
  }
}

/// Read a scrape bundle from disk.
pub fn read_scrape_file(path: impl AsRef<Path>) -> Result<ScrapeBundle> {
  let file = File::open(path)?;
  Ok(serde_json::from_reader(BufReader::new(file))?)
}
