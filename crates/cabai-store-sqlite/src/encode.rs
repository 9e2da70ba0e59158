//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and labels as `0`/`1` integers.

use cabai_core::record::{ClassificationRecord, Label};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawRecord::from_row`].
pub const RECORD_COLUMNS: &str = "id, path, hasil, created_at, updated_at";

/// Raw values read directly from a `klasifikasi` row.
pub struct RawRecord {
  pub id:         i64,
  pub path:       String,
  pub hasil:      i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawRecord {
      id:         row.get(0)?,
      path:       row.get(1)?,
      hasil:      row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_record(self) -> Result<ClassificationRecord> {
    let label = Label::from_flag(self.hasil)
      .map_err(|_| Error::CorruptLabel { id: self.id, flag: self.hasil })?;
    Ok(ClassificationRecord {
      id: self.id,
      path: self.path,
      label,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
