//! Error types for `drawvault-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown lottery type: {0:?}")]
  UnknownLotteryType(String),

  #[error("unparseable draw date: {0:?}")]
  BadDrawDate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
