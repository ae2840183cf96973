//! Error types for `drawvault-import`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] drawvault_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A required spreadsheet column could not be resolved from the headers.
  #[error("missing column: {0}")]
  MissingColumn(&'static str),

  #[error("bad record: {0}")]
  BadRecord(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
