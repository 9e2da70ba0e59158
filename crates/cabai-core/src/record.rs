//! The classification record, the only entity in the system.
//!
//! Records are written exactly once by ingestion and never updated or
//! deleted. Field names follow the wire format of the HTTP API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

// ─── Label ───────────────────────────────────────────────────────────────────

/// The binary outcome reported by the camera device.
///
/// Stored as a flag (`1` healthy, `0` diseased) and always rendered to API
/// clients as `"Sehat"` or `"Sakit"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
  #[serde(rename = "Sakit")]
  Diseased,
  #[serde(rename = "Sehat")]
  Healthy,
}

impl Label {
  /// The integer stored in the `hasil` column.
  pub fn flag(self) -> i64 {
    match self {
      Self::Diseased => 0,
      Self::Healthy => 1,
    }
  }

  /// Parse the raw integer accepted by the upload and filter endpoints.
  pub fn from_flag(flag: i64) -> Result<Self, ValidationError> {
    match flag {
      0 => Ok(Self::Diseased),
      1 => Ok(Self::Healthy),
      other => Err(ValidationError::InvalidLabel(other)),
    }
  }

  /// Human-readable name used on every response path.
  pub fn display_name(self) -> &'static str {
    match self {
      Self::Diseased => "Sakit",
      Self::Healthy => "Sehat",
    }
  }
}

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.display_name())
  }
}

// ─── ClassificationRecord ────────────────────────────────────────────────────

/// A persisted classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
  /// Assigned by the store; strictly increasing, never reused.
  pub id:         i64,
  /// Blob key of the stored image.
  pub path:       String,
  #[serde(rename = "hasil")]
  pub label:      Label,
  pub created_at: DateTime<Utc>,
  /// Equal to `created_at`; there is no update path.
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::insert`].
/// `id` and both timestamps are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
  pub path:  String,
  pub label: Label,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// One page of records, newest first, plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPage {
  #[serde(rename = "total_data")]
  pub total:   u64,
  #[serde(rename = "data")]
  pub records: Vec<ClassificationRecord>,
}

/// Raw per-label counts read from the store in a single transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
  pub total:    u64,
  pub healthy:  u64,
  pub diseased: u64,
}

/// Aggregate statistics over all records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
  #[serde(rename = "total_data")]
  pub total:            u64,
  #[serde(rename = "status_sehat")]
  pub healthy:          u64,
  #[serde(rename = "status_sakit")]
  pub diseased:         u64,
  #[serde(rename = "persentase_sehat")]
  pub healthy_percent:  f64,
  #[serde(rename = "persentase_sakit")]
  pub diseased_percent: f64,
}

impl Statistics {
  /// Derive percentages from raw counts. An empty store reports `0` for both
  /// percentages.
  pub fn from_counts(counts: LabelCounts) -> Self {
    Self {
      total:            counts.total,
      healthy:          counts.healthy,
      diseased:         counts.diseased,
      healthy_percent:  percent(counts.healthy, counts.total),
      diseased_percent: percent(counts.diseased, counts.total),
    }
  }
}

/// `part / total * 100`, rounded to two decimal places.
fn percent(part: u64, total: u64) -> f64 {
  if total == 0 {
    return 0.0;
  }
  round_hundredths(part as f64 / total as f64 * 100.0)
}

/// Round a non-negative finite `x` to two decimals, ties to even.
///
/// The decision is taken on the exact binary value of `x`, not on `x * 100`,
/// so `0.125` becomes `0.12` and a value stored just above a tie rounds up.
fn round_hundredths(x: f64) -> f64 {
  let bits = x.to_bits();
  let exp_bits = ((bits >> 52) & 0x7ff) as i32;
  let frac = bits & ((1 << 52) - 1);
  let (mantissa, exp) = if exp_bits == 0 {
    (frac, -1074)
  } else {
    (frac | (1 << 52), exp_bits - 1075)
  };

  // x * 100 == scaled * 2^exp exactly.
  let scaled = u128::from(mantissa) * 100;
  if exp >= 0 {
    return x;
  }
  let shift = -exp;
  if shift >= 127 {
    return 0.0;
  }

  let mut hundredths = scaled >> shift;
  let rem = scaled & ((1u128 << shift) - 1);
  let half = 1u128 << (shift - 1);
  if rem > half || (rem == half && hundredths % 2 == 1) {
    hundredths += 1;
  }
  hundredths as f64 / 100.0
}
