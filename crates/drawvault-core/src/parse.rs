//! Field parsers for the loosely-formatted values arriving from
//! spreadsheets, OCR output, and page scrapes.
//!
//! All parsers here are best-effort and total: bad input yields an empty or
//! default value, never an error. Whether the resulting record is usable is
//! decided later, by validation inside the reconcile policy.

use chrono::NaiveDate;

/// Placeholder text used in template spreadsheets; any cell carrying it is
/// instructional noise, not data.
pub const EXAMPLE_MARKER: &str = "Example:";

// ─── Numbers ─────────────────────────────────────────────────────────────────

/// Parse a delimiter-separated list of winning numbers.
///
/// Tries comma, space, then semicolon. A split is accepted only if every
/// non-empty token is a pure digit string; otherwise the next delimiter is
/// tried. Falls back to single-number parsing. Placeholder text and total
/// failure both come back as an empty vec.
pub fn parse_numbers(raw: &str) -> Vec<u32> {
  let raw = raw.trim();
  if raw.is_empty() || raw.contains(EXAMPLE_MARKER) {
    return Vec::new();
  }

  for delim in [',', ' ', ';'] {
    if !raw.contains(delim) {
      continue;
    }
    let tokens: Vec<&str> = raw
      .split(delim)
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .collect();
    if !tokens.is_empty()
      && tokens.iter().all(|t| t.chars().all(|c| c.is_ascii_digit()))
    {
      return tokens.iter().filter_map(|t| t.parse().ok()).collect();
    }
  }

  raw.parse::<u32>().map(|n| vec![n]).unwrap_or_default()
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Date formats seen across the source spreadsheets and scraped pages.
const DATE_FORMATS: &[&str] = &[
  "%Y-%m-%d",
  "%d/%m/%Y",
  "%Y/%m/%d",
  "%d-%m-%Y",
  "%d %B %Y",
  "%d %b %Y",
];

/// Parse a draw date from any of the known source formats. Datetime strings
/// are accepted by keeping only their date part.
pub fn parse_draw_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  for format in DATE_FORMATS {
    if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
      return Some(date);
    }
  }

  // "2025-05-14T00:00:00" and friends: try the segment before 'T' or ' '.
  let head = raw.split(['T', ' ']).next()?;
  if head == raw {
    return None;
  }
  DATE_FORMATS
    .iter()
    .find_map(|format| NaiveDate::parse_from_str(head, format).ok())
}

// ─── Winners ─────────────────────────────────────────────────────────────────

/// Parse a winner count that may carry grouping separators ("1,234").
/// Unparseable input counts as zero winners.
pub fn parse_winners(raw: &str) -> u32 {
  let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
  digits.parse().unwrap_or(0)
}

// ─── Prizes ──────────────────────────────────────────────────────────────────

/// Normalize a prize string: guarantee the "R" currency prefix, and reformat
/// purely numeric input with thousands separators and two decimals.
/// Already-formatted strings pass through untouched.
pub fn format_prize(raw: &str) -> String {
  let raw = raw.trim();
  if raw.is_empty() {
    return String::new();
  }
  if let Some(formatted) = numeric_prize(raw) {
    return formatted;
  }
  if raw.starts_with('R') {
    raw.to_owned()
  } else {
    format!("R{raw}")
  }
}

/// `"1000000"` / `"1000000.5"` → `"R1,000,000.50"`. `None` if the input is
/// not a plain number.
fn numeric_prize(raw: &str) -> Option<String> {
  let (int_part, frac_part) = match raw.split_once('.') {
    Some((i, f)) => (i, Some(f)),
    None => (raw, None),
  };
  if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
    return None;
  }
  let cents: u32 = match frac_part {
    None => 0,
    Some(f) if f.chars().all(|c| c.is_ascii_digit()) && !f.is_empty() => {
      let padded = format!("{f:0<2}");
      padded[..2].parse().ok()?
    }
    Some(_) => return None,
  };
  Some(format!("R{}.{cents:02}", group_thousands(int_part)))
}

fn group_thousands(digits: &str) -> String {
  let bytes = digits.as_bytes();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, b) in bytes.iter().enumerate() {
    if i > 0 && (bytes.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(*b as char);
  }
  out
}

// ─── Division labels ─────────────────────────────────────────────────────────

/// `"Division 3"` / `"DIV3"` → `3`. The first digit run in the label is the
/// division number.
pub fn parse_division_label(label: &str) -> Option<u8> {
  let digits: String = label
    .chars()
    .skip_while(|c| !c.is_ascii_digit())
    .take_while(|c| c.is_ascii_digit())
    .collect();
  digits.parse().ok()
}

/// The canonical display label for a division number.
pub fn division_label(division: u8) -> String {
  format!("Division {division}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_numbers_accepts_all_three_delimiters() {
    let expected = vec![1, 2, 3, 4, 5, 6];
    assert_eq!(parse_numbers("1, 2, 3, 4, 5, 6"), expected);
    assert_eq!(parse_numbers("1 2 3 4 5 6"), expected);
    assert_eq!(parse_numbers("1;2;3;4;5;6"), expected);
  }

  #[test]
  fn parse_numbers_single_value_fallback() {
    assert_eq!(parse_numbers("17"), vec![17]);
  }

  #[test]
  fn parse_numbers_rejects_placeholder_and_garbage() {
    assert_eq!(parse_numbers("Example: 1,2,3"), Vec::<u32>::new());
    assert_eq!(parse_numbers(""), Vec::<u32>::new());
    assert_eq!(parse_numbers("one two three"), Vec::<u32>::new());
    // Mixed tokens invalidate the whole split.
    assert_eq!(parse_numbers("1, 2, x"), Vec::<u32>::new());
  }

  #[test]
  fn parse_draw_date_known_formats() {
    let expected = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
    assert_eq!(parse_draw_date("2025-05-14"), Some(expected));
    assert_eq!(parse_draw_date("14/05/2025"), Some(expected));
    assert_eq!(parse_draw_date("14 May 2025"), Some(expected));
    assert_eq!(parse_draw_date("2025-05-14T00:00:00"), Some(expected));
    assert_eq!(parse_draw_date("not a date"), None);
  }

  #[test]
  fn parse_winners_tolerates_separators() {
    assert_eq!(parse_winners("1,234"), 1234);
    assert_eq!(parse_winners("5"), 5);
    assert_eq!(parse_winners("-"), 0);
  }

  #[test]
  fn format_prize_reformats_bare_numbers() {
    assert_eq!(format_prize("1000000"), "R1,000,000.00");
    assert_eq!(format_prize("1000000.5"), "R1,000,000.50");
    assert_eq!(format_prize("532"), "R532.00");
  }

  #[test]
  fn format_prize_prefixes_and_passes_through() {
    assert_eq!(format_prize("R1,000,000.00"), "R1,000,000.00");
    assert_eq!(format_prize("1,000,000.00"), "R1,000,000.00");
    assert_eq!(format_prize(""), "");
  }

  #[test]
  fn division_labels_round_trip() {
    assert_eq!(parse_division_label("Division 3"), Some(3));
    assert_eq!(parse_division_label("DIV8 WINNERS"), Some(8));
    assert_eq!(parse_division_label("no digits"), None);
    assert_eq!(division_label(1), "Division 1");
  }
}
