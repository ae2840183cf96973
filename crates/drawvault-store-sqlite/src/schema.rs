//! SQL schema for the Drawvault SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The UNIQUE constraint on (lottery_type, draw_number) is what makes the
/// reconcile policy's insert-on-conflict path safe against concurrent
/// import scripts hitting the same draw.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS draw_results (
    id            INTEGER PRIMARY KEY,
    lottery_type  TEXT NOT NULL,   -- canonical name, e.g. 'Lottery Plus 1'
    draw_number   TEXT NOT NULL,   -- normalized numeric string
    draw_date     TEXT NOT NULL,   -- ISO 8601 date
    numbers       TEXT NOT NULL DEFAULT '[]',  -- JSON array of ints
    bonus_numbers TEXT NOT NULL DEFAULT '[]',  -- JSON array of ints
    divisions     TEXT NOT NULL DEFAULT '{}',  -- JSON: 'Division N' -> {winners, prize}
    source_url    TEXT,
    ocr_provider  TEXT,
    ocr_model     TEXT,
    ocr_timestamp TEXT,            -- RFC 3339 or NULL
    recorded_at   TEXT NOT NULL,   -- RFC 3339; server-assigned
    updated_at    TEXT NOT NULL,
    UNIQUE (lottery_type, draw_number)
);

CREATE INDEX IF NOT EXISTS draw_results_type_date_idx
    ON draw_results(lottery_type, draw_date);

PRAGMA user_version = 1;
";
