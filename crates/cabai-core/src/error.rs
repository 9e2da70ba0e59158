//! Error types for `cabai-core`.
//!
//! Display strings of [`ValidationError`] and [`Error::NotFound`] are shown to
//! API clients verbatim, so they use the API's Indonesian vocabulary.

use thiserror::Error;

/// Caller-supplied input was rejected before any side effect took place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("File type tidak didukung: {0:?}. Gunakan: jpg, jpeg, png, bmp")]
  UnsupportedExtension(String),

  #[error("Nilai hasil harus 0 (Sakit) atau 1 (Sehat), bukan {0}")]
  InvalidLabel(i64),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Data dengan id {0} tidak ditemukan")]
  NotFound(i64),

  #[error("record store error: {0}")]
  RecordStore(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("blob store error: {0}")]
  BlobStore(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
