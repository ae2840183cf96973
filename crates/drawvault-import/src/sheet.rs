//! Spreadsheet import over CSV exports.
//!
//! Column positions are resolved by fuzzy header matching, so both the
//! structured results template ("Game Name", "Draw Number", "Division N
//! Winners"/"Division N Payout") and ad-hoc sheets with "div N"-style
//! columns import through the same path. Rows carrying the template's
//! "Example:" placeholder are instructional noise and are dropped.

use std::{io, path::Path};

use csv::StringRecord;

use drawvault_core::{
  draw::{DivisionEntry, NewDraw},
  normalize::normalize_lottery_type,
  parse::{
    EXAMPLE_MARKER, format_prize, parse_division_label, parse_draw_date,
    parse_numbers, parse_winners,
  },
};

use crate::{Error, Result};

// ─── Header resolution ───────────────────────────────────────────────────────

/// What a division column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisionField {
  Winners,
  Prize,
}

/// Resolved column positions for one sheet.
#[derive(Debug, Clone)]
pub struct HeaderMap {
  game:        usize,
  draw_number: usize,
  draw_date:   usize,
  numbers:     Option<usize>,
  bonus:       Option<usize>,
  /// (division number, field, column index)
  divisions:   Vec<(u8, DivisionField, usize)>,
}

impl HeaderMap {
  pub fn from_headers(headers: &StringRecord) -> Result<Self> {
    let mut game = None;
    let mut draw_number = None;
    let mut draw_date = None;
    let mut numbers = None;
    let mut bonus = None;
    let mut divisions = Vec::new();

    for (index, header) in headers.iter().enumerate() {
      let h = header.trim().to_lowercase();

      // Division columns first; "division 1 winners" must not be grabbed
      // by the generic matchers below.
      if h.contains("division") || h.contains("div") {
        if let Some(division) = parse_division_label(&h) {
          let field = if h.contains("winner") {
            DivisionField::Winners
          } else {
            // "Division N Payout", "div N prize", or a bare ad-hoc
            // "div N" column — all hold the payout.
            DivisionField::Prize
          };
          divisions.push((division, field, index));
          continue;
        }
      }

      if game.is_none()
        && (h.contains("game") || h.contains("lottery type") || h == "type")
      {
        game = Some(index);
      } else if draw_number.is_none()
        && h.contains("draw")
        && (h.contains("number") || h.contains("no"))
      {
        draw_number = Some(index);
      } else if draw_date.is_none() && h.contains("date") {
        draw_date = Some(index);
      } else if numbers.is_none() && h.contains("numbers") {
        numbers = Some(index);
      } else if bonus.is_none() && h.contains("bonus") {
        bonus = Some(index);
      }
    }

    Ok(Self {
      game:        game.ok_or(Error::MissingColumn("game name"))?,
      draw_number: draw_number.ok_or(Error::MissingColumn("draw number"))?,
      draw_date:   draw_date.ok_or(Error::MissingColumn("draw date"))?,
      numbers,
      bonus,
      divisions,
    })
  }
}

// ─── Row adapter ─────────────────────────────────────────────────────────────

/// Adapt one data row. `Ok(None)` means the row is a placeholder or blank
/// and should be silently dropped.
pub fn parse_row(map: &HeaderMap, record: &StringRecord) -> Result<Option<NewDraw>> {
  if record.iter().any(|cell| cell.contains(EXAMPLE_MARKER)) {
    return Ok(None);
  }

  let cell = |index: usize| record.get(index).unwrap_or("").trim();

  let game = cell(map.game);
  let draw_number = cell(map.draw_number);
  if game.is_empty() && draw_number.is_empty() {
    return Ok(None);
  }

  let date_raw = cell(map.draw_date);
  let draw_date = parse_draw_date(date_raw)
    .ok_or_else(|| drawvault_core::Error::BadDrawDate(date_raw.to_owned()))?;

  let mut draw =
    NewDraw::new(normalize_lottery_type(game), draw_number, draw_date);
  if let Some(index) = map.numbers {
    draw.numbers = parse_numbers(cell(index));
  }
  if let Some(index) = map.bonus {
    draw.bonus_numbers = parse_numbers(cell(index));
  }

  for &(division, field, index) in &map.divisions {
    let value = cell(index);
    if value.is_empty() || value.contains(EXAMPLE_MARKER) {
      continue;
    }
    let entry = draw
      .divisions
      .entry(division)
      .or_insert_with(|| DivisionEntry { winners: 0, prize: String::new() });
    match field {
      DivisionField::Winners => entry.winners = parse_winners(value),
      DivisionField::Prize => entry.prize = format_prize(value),
    }
  }

  Ok(Some(draw))
}

/// Adapt a whole sheet. Row-level failures stay in the list so the batch
/// runner can count them without losing the rest of the sheet.
pub fn parse_sheet<R: io::Read>(
  reader: &mut csv::Reader<R>,
) -> Result<Vec<Result<NewDraw>>> {
  let map = HeaderMap::from_headers(&reader.headers()?.clone())?;

  let mut out = Vec::new();
  for record in reader.records() {
    match record {
      Ok(record) => match parse_row(&map, &record) {
        Ok(Some(draw)) => out.push(Ok(draw)),
        Ok(None) => {}
        Err(e) => out.push(Err(e)),
      },
      Err(e) => out.push(Err(e.into())),
    }
  }
  Ok(out)
}

/// Read and adapt a CSV file from disk.
pub fn read_sheet(path: impl AsRef<Path>) -> Result<Vec<Result<NewDraw>>> {
  let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
  parse_sheet(&mut reader)
}

#[cfg(test)]
mod tests {
  use super::*;
  use drawvault_core::draw::LotteryType;

  fn sheet(csv_text: &str) -> Vec<Result<NewDraw>> {
    let mut reader =
      csv::ReaderBuilder::new().flexible(true).from_reader(csv_text.as_bytes());
    parse_sheet(&mut reader).unwrap()
  }

  #[test]
  fn template_sheet_with_structured_division_columns() {
    let rows = sheet(
      "Game Name,Draw Number,Draw Date,Winning Numbers,Bonus Ball,Division 1 Winners,Division 1 Payout,Division 2 Winners,Division 2 Payout\n\
       Lotto,2530,2025-05-14,\"5, 12, 19, 33, 40, 51\",7,0,10000000,28,7412.50\n",
    );

    assert_eq!(rows.len(), 1);
    let draw = rows.into_iter().next().unwrap().unwrap();
    assert_eq!(draw.lottery_type, LotteryType::Lottery);
    assert_eq!(draw.draw_number, "2530");
    assert_eq!(draw.numbers, vec![5, 12, 19, 33, 40, 51]);
    assert_eq!(draw.bonus_numbers, vec![7]);
    assert_eq!(draw.divisions.len(), 2);
    assert_eq!(draw.divisions[&1].winners, 0);
    assert_eq!(draw.divisions[&1].prize, "R10,000,000.00");
    assert_eq!(draw.divisions[&2].winners, 28);
    assert_eq!(draw.divisions[&2].prize, "R7,412.50");
  }

  #[test]
  fn ad_hoc_headers_resolve_by_fuzzy_match() {
    let rows = sheet(
      "game,draw no,date,numbers,div 1,div 2\n\
       Powerball Plus,1631,14/05/2025,14 19 37 44 48,5000000,120.50\n",
    );

    let draw = rows.into_iter().next().unwrap().unwrap();
    assert_eq!(draw.lottery_type, LotteryType::PowerballPlus);
    assert_eq!(draw.draw_number, "1631");
    assert_eq!(draw.numbers, vec![14, 19, 37, 44, 48]);
    assert_eq!(draw.divisions[&1].prize, "R5,000,000.00");
    assert_eq!(draw.divisions[&2].prize, "R120.50");
  }

  #[test]
  fn example_rows_and_blank_rows_are_dropped() {
    let rows = sheet(
      "Game Name,Draw Number,Draw Date,Winning Numbers\n\
       Lotto,Example: 2530,2025-05-14,\"Example: 1,2,3\"\n\
       ,,,\n\
       Daily Lotto,744,2025-05-14,\"2, 9, 15, 21, 30\"\n",
    );

    assert_eq!(rows.len(), 1);
    let draw = rows.into_iter().next().unwrap().unwrap();
    assert_eq!(draw.lottery_type, LotteryType::DailyLottery);
    assert_eq!(draw.draw_number, "744");
  }

  #[test]
  fn bad_date_is_a_row_error_not_a_sheet_error() {
    let rows = sheet(
      "Game Name,Draw Number,Draw Date,Winning Numbers\n\
       Lotto,2530,not a date,\"1, 2, 3\"\n\
       Lotto,2531,2025-05-17,\"4, 5, 6\"\n",
    );

    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_err());
    assert!(rows[1].is_ok());
  }

  #[test]
  fn missing_required_column_fails_the_sheet() {
    let mut reader = csv::ReaderBuilder::new()
      .flexible(true)
      .from_reader("Winning Numbers,Bonus Ball\n1 2 3,4\n".as_bytes());
    assert!(matches!(
      parse_sheet(&mut reader),
      Err(Error::MissingColumn(_))
    ));
  }
}
