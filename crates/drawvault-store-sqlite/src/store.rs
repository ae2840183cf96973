//! [`SqliteStore`] — the SQLite implementation of [`DrawStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use drawvault_core::{
  draw::{DrawResult, LotteryType, NewDraw},
  normalize::normalize_draw_number,
  quality::{self, Verdict},
  store::{DrawQuery, DrawStore, ReconcileOutcome, SkipReason},
};

use crate::{
  Error, Result,
  encode::{
    RawDrawRow, decode_divisions, decode_numbers, encode_date,
    encode_divisions, encode_dt, encode_numbers,
  },
  error::boxed,
  schema::SCHEMA,
};

const COLUMNS: &str = "id, lottery_type, draw_number, draw_date, numbers, \
   bonus_numbers, divisions, source_url, ocr_provider, ocr_model, \
   ocr_timestamp, recorded_at, updated_at";

fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDrawRow> {
  Ok(RawDrawRow {
    id:            row.get(0)?,
    lottery_type:  row.get(1)?,
    draw_number:   row.get(2)?,
    draw_date:     row.get(3)?,
    numbers:       row.get(4)?,
    bonus_numbers: row.get(5)?,
    divisions:     row.get(6)?,
    source_url:    row.get(7)?,
    ocr_provider:  row.get(8)?,
    ocr_model:     row.get(9)?,
    ocr_timestamp: row.get(10)?,
    recorded_at:   row.get(11)?,
    updated_at:    row.get(12)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A draw-results store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Reconcile internals ─────────────────────────────────────────────────────
//
// Everything below runs inside one transaction on the connection thread, so
// the lookup and the insert-or-merge decision are atomic with respect to
// other writers on the same database file.

/// Exact lookup on the dedup key, then the fuzzy fallback: same game family
/// prefix plus draw-number substring, preferring a candidate that already
/// has division data.
fn find_match(
  tx: &rusqlite::Transaction<'_>,
  lottery_type: LotteryType,
  draw_number: &str,
) -> std::result::Result<Option<RawDrawRow>, tokio_rusqlite::Error> {
  let exact = tx
    .query_row(
      &format!(
        "SELECT {COLUMNS} FROM draw_results
         WHERE lottery_type = ?1 AND draw_number = ?2"
      ),
      rusqlite::params![lottery_type.canonical_name(), draw_number],
      read_raw,
    )
    .optional()?;
  if exact.is_some() {
    return Ok(exact);
  }

  let mut stmt = tx.prepare(&format!(
    "SELECT {COLUMNS} FROM draw_results
     WHERE lottery_type LIKE ?1 AND draw_number LIKE ?2
     ORDER BY id"
  ))?;
  let candidates: Vec<RawDrawRow> = stmt
    .query_map(
      rusqlite::params![
        format!("{}%", lottery_type.family_prefix()),
        format!("%{draw_number}%"),
      ],
      read_raw,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  if candidates.len() > 1 {
    debug!(
      lottery_type = %lottery_type,
      draw_number,
      candidates = candidates.len(),
      "ambiguous fuzzy match; preferring a row with division data"
    );
  }

  let preferred = candidates
    .iter()
    .position(RawDrawRow::has_division_data)
    .unwrap_or(0);
  Ok(candidates.into_iter().nth(preferred))
}

fn insert_draw(
  tx: &rusqlite::Transaction<'_>,
  incoming: &NewDraw,
  draw_number: &str,
) -> std::result::Result<bool, tokio_rusqlite::Error> {
  let now = encode_dt(Utc::now());
  let numbers = encode_numbers(&incoming.numbers).map_err(boxed)?;
  let bonus = encode_numbers(&incoming.bonus_numbers).map_err(boxed)?;
  let divisions = encode_divisions(&incoming.divisions).map_err(boxed)?;
  let prov = &incoming.provenance;

  let inserted = tx.execute(
    "INSERT INTO draw_results (
       lottery_type, draw_number, draw_date, numbers, bonus_numbers,
       divisions, source_url, ocr_provider, ocr_model, ocr_timestamp,
       recorded_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
     ON CONFLICT (lottery_type, draw_number) DO NOTHING",
    rusqlite::params![
      incoming.lottery_type.canonical_name(),
      draw_number,
      encode_date(incoming.draw_date),
      numbers,
      bonus,
      divisions,
      prov.source_url,
      prov.ocr_provider,
      prov.ocr_model,
      prov.ocr_timestamp.map(encode_dt),
      now,
      now,
    ],
  )?;
  Ok(inserted > 0)
}

/// Per-field merge of an incoming record into an existing row. Each field
/// is replaced only when the incoming value is judged better; provenance
/// fields are filled only when the stored value is empty.
fn merge_into(
  tx: &rusqlite::Transaction<'_>,
  existing: &RawDrawRow,
  incoming: &NewDraw,
) -> std::result::Result<ReconcileOutcome, tokio_rusqlite::Error> {
  let mut fields: Vec<&'static str> = Vec::new();
  let mut values: Vec<String> = Vec::new();

  let stored_numbers =
    decode_numbers(existing.numbers.as_deref()).map_err(boxed)?;
  if !quality::numbers_valid(&stored_numbers)
    && quality::numbers_valid(&incoming.numbers)
  {
    fields.push("numbers");
    values.push(encode_numbers(&incoming.numbers).map_err(boxed)?);
  }

  let stored_bonus =
    decode_numbers(existing.bonus_numbers.as_deref()).map_err(boxed)?;
  if !quality::numbers_valid(&stored_bonus)
    && quality::numbers_valid(&incoming.bonus_numbers)
  {
    fields.push("bonus_numbers");
    values.push(encode_numbers(&incoming.bonus_numbers).map_err(boxed)?);
  }

  let stored_divisions =
    decode_divisions(existing.divisions.as_deref()).map_err(boxed)?;
  if quality::divisions_verdict(&stored_divisions, &incoming.divisions)
    == Verdict::Better
  {
    fields.push("divisions");
    values.push(encode_divisions(&incoming.divisions).map_err(boxed)?);
  }

  let provenance_fields: [(&'static str, Option<&str>, Option<String>); 4] = [
    (
      "source_url",
      existing.source_url.as_deref(),
      incoming.provenance.source_url.clone(),
    ),
    (
      "ocr_provider",
      existing.ocr_provider.as_deref(),
      incoming.provenance.ocr_provider.clone(),
    ),
    (
      "ocr_model",
      existing.ocr_model.as_deref(),
      incoming.provenance.ocr_model.clone(),
    ),
    (
      "ocr_timestamp",
      existing.ocr_timestamp.as_deref(),
      incoming.provenance.ocr_timestamp.map(encode_dt),
    ),
  ];
  for (column, stored, candidate) in provenance_fields {
    let stored_empty = stored.map(str::trim).is_none_or(str::is_empty);
    if let Some(value) = candidate
      && stored_empty
      && !value.trim().is_empty()
    {
      fields.push(column);
      values.push(value);
    }
  }

  if fields.is_empty() {
    return Ok(ReconcileOutcome::Unchanged);
  }

  let set_clause = fields
    .iter()
    .enumerate()
    .map(|(i, field)| format!("{field} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!(
    "UPDATE draw_results SET {set_clause}, updated_at = ?{} WHERE id = ?{}",
    fields.len() + 1,
    fields.len() + 2,
  );

  values.push(encode_dt(Utc::now()));
  let mut params: Vec<&dyn rusqlite::ToSql> =
    values.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
  params.push(&existing.id);
  tx.execute(&sql, rusqlite::params_from_iter(params))?;

  Ok(ReconcileOutcome::Updated { fields })
}

fn reconcile_in_tx(
  tx: &rusqlite::Transaction<'_>,
  incoming: &NewDraw,
  draw_number: &str,
) -> std::result::Result<ReconcileOutcome, tokio_rusqlite::Error> {
  match find_match(tx, incoming.lottery_type, draw_number)? {
    Some(existing) => merge_into(tx, &existing, incoming),
    None => {
      if !quality::numbers_valid(&incoming.numbers) {
        return Ok(ReconcileOutcome::Skipped {
          reason: SkipReason::MissingNumbers,
        });
      }
      if insert_draw(tx, incoming, draw_number)? {
        Ok(ReconcileOutcome::Created)
      } else {
        // The UNIQUE constraint fired: another writer created this row
        // since our lookup. Re-read and merge instead.
        match find_match(tx, incoming.lottery_type, draw_number)? {
          Some(existing) => merge_into(tx, &existing, incoming),
          None => Ok(ReconcileOutcome::Unchanged),
        }
      }
    }
  }
}

// ─── DrawStore impl ──────────────────────────────────────────────────────────

impl DrawStore for SqliteStore {
  type Error = Error;

  async fn reconcile(&self, incoming: NewDraw) -> Result<ReconcileOutcome> {
    // Record-level validation happens before we touch the database.
    let Some(draw_number) = normalize_draw_number(&incoming.draw_number)
    else {
      return Ok(ReconcileOutcome::Skipped {
        reason: SkipReason::MissingDrawNumber,
      });
    };
    if !incoming.numbers.is_empty()
      && !quality::numbers_valid(&incoming.numbers)
    {
      return Ok(ReconcileOutcome::Skipped {
        reason: SkipReason::AllZeroNumbers,
      });
    }

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let outcome = reconcile_in_tx(&tx, &incoming, &draw_number)?;
        tx.commit()?;
        Ok(outcome)
      })
      .await?;
    Ok(outcome)
  }

  async fn get_draw(
    &self,
    lottery_type: LotteryType,
    draw_number: &str,
  ) -> Result<Option<DrawResult>> {
    let type_name = lottery_type.canonical_name();
    let number = draw_number.to_owned();

    let raw: Option<RawDrawRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COLUMNS} FROM draw_results
                 WHERE lottery_type = ?1 AND draw_number = ?2"
              ),
              rusqlite::params![type_name, number],
              read_raw,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDrawRow::into_draw).transpose()
  }

  async fn list_draws(
    &self,
    query: &DrawQuery,
  ) -> Result<Vec<DrawResult>> {
    let type_name = query
      .lottery_type
      .map(LotteryType::canonical_name)
      .map(str::to_owned);
    let since = query.since.map(encode_date);
    let until = query.until.map(encode_date);
    // SQLite treats a negative LIMIT as "no limit".
    let limit = query.limit.map(|n| n as i64).unwrap_or(-1);
    let offset = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawDrawRow> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec![];
        if type_name.is_some() {
          conds.push("lottery_type = ?1");
        }
        if since.is_some() {
          conds.push("draw_date >= ?2");
        }
        if until.is_some() {
          conds.push("draw_date <= ?3");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {COLUMNS} FROM draw_results
           {where_clause}
           ORDER BY draw_date DESC, id DESC
           LIMIT ?4 OFFSET ?5"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              type_name.as_deref(),
              since.as_deref(),
              until.as_deref(),
              limit,
              offset,
            ],
            read_raw,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDrawRow::into_draw).collect()
  }

  async fn latest_draw(
    &self,
    lottery_type: LotteryType,
  ) -> Result<Option<DrawResult>> {
    let type_name = lottery_type.canonical_name();

    let raw: Option<RawDrawRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COLUMNS} FROM draw_results
                 WHERE lottery_type = ?1
                 ORDER BY draw_date DESC, id DESC
                 LIMIT 1"
              ),
              rusqlite::params![type_name],
              read_raw,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDrawRow::into_draw).transpose()
  }
}
