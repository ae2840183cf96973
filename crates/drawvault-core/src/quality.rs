//! Field-quality heuristics behind the "update only if better" merge policy.
//!
//! Everything here is pure and persistence-free: the store decodes both
//! sides and asks these functions for a verdict. The prize comparison is a
//! formatting heuristic, not a total order — two differently-formatted
//! strings can both be `Equal` to a third.

use crate::draw::Divisions;

/// Ordering verdict for a candidate replacement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
  Better,
  Equal,
  Worse,
}

// ─── Numbers ─────────────────────────────────────────────────────────────────

/// A numbers array is usable only if it is non-empty with at least one
/// non-zero value. All-zero arrays are failed extractions.
pub fn numbers_valid(numbers: &[u32]) -> bool {
  !numbers.is_empty() && numbers.iter().any(|&n| n != 0)
}

// ─── Prizes ──────────────────────────────────────────────────────────────────

fn has_separators(s: &str) -> bool {
  s.contains(',') || s.contains('.')
}

fn has_currency(s: &str) -> bool {
  s.trim_start().starts_with('R')
}

/// Compare two prize strings for the same division.
///
/// Incoming wins when it carries formatting the existing value lacks:
/// thousands separators / decimals, or the currency prefix. The mirror
/// cases are `Worse`; everything else is `Equal`.
pub fn prize_verdict(existing: &str, incoming: &str) -> Verdict {
  let (old, new) = (existing.trim(), incoming.trim());

  if new.is_empty() {
    return if old.is_empty() { Verdict::Equal } else { Verdict::Worse };
  }
  if old.is_empty() {
    return Verdict::Better;
  }

  if has_separators(new) && !has_separators(old) {
    return Verdict::Better;
  }
  if has_currency(new) && !has_currency(old) {
    return Verdict::Better;
  }
  if (has_separators(old) && !has_separators(new))
    || (has_currency(old) && !has_currency(new))
  {
    return Verdict::Worse;
  }
  Verdict::Equal
}

// ─── Divisions ───────────────────────────────────────────────────────────────

/// True if any division present in *both* maps has a better-formatted prize
/// on the incoming side. Divisions only one side knows about don't count
/// here; they are handled by the count comparison in [`divisions_verdict`].
pub fn has_better_formatted_prizes(
  existing: &Divisions,
  incoming: &Divisions,
) -> bool {
  incoming.iter().any(|(division, entry)| {
    existing
      .get(division)
      .is_some_and(|old| prize_verdict(&old.prize, &entry.prize) == Verdict::Better)
  })
}

/// Whole-field verdict for the divisions map. Incoming is `Better` when the
/// store has nothing, when it covers more divisions, or when its prize
/// strings are better formatted.
pub fn divisions_verdict(existing: &Divisions, incoming: &Divisions) -> Verdict {
  if incoming.is_empty() {
    return if existing.is_empty() { Verdict::Equal } else { Verdict::Worse };
  }
  if existing.is_empty()
    || incoming.len() > existing.len()
    || has_better_formatted_prizes(existing, incoming)
  {
    return Verdict::Better;
  }
  Verdict::Equal
}
