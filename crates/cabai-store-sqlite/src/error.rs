//! Error type for `cabai-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row carries a `hasil` flag outside {0, 1}.
  #[error("corrupt label flag in row {id}: {flag}")]
  CorruptLabel { id: i64, flag: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
