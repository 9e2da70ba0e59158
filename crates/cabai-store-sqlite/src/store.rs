//! The SQLite implementation of [`RecordStore`].

use std::path::Path;

use cabai_core::{
  record::{ClassificationRecord, Label, LabelCounts, NewRecord, RecordPage},
  store::RecordStore,
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RECORD_COLUMNS, RawRecord, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store backed by a single SQLite file.
///
/// The connection is the only process-lifetime database handle; each trait
/// method runs as its own transaction on it. Cloning is cheap; the inner
/// connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(?path, "record store opened");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
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

/// Clamp a caller-supplied count into SQLite's signed integer range.
fn to_sql_count(n: u64) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: NewRecord) -> Result<ClassificationRecord> {
    let now    = Utc::now();
    let at_str = encode_dt(now);
    let path   = input.path.clone();
    let flag   = input.label.flag();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO klasifikasi (path, hasil, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![path, flag, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(ClassificationRecord {
      id,
      path:       input.path,
      label:      input.label,
      created_at: now,
      updated_at: now,
    })
  }

  async fn get(&self, id: i64) -> Result<Option<ClassificationRecord>> {
    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RECORD_COLUMNS} FROM klasifikasi WHERE id = ?1"),
              rusqlite::params![id],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn list(&self, skip: u64, limit: u64) -> Result<RecordPage> {
    let skip_val  = to_sql_count(skip);
    let limit_val = to_sql_count(limit);

    let (total, raws): (i64, Vec<RawRecord>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let total: i64 =
          tx.query_row("SELECT COUNT(*) FROM klasifikasi", [], |r| r.get(0))?;
        let raws = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM klasifikasi
             ORDER BY id DESC
             LIMIT ?1 OFFSET ?2"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params![limit_val, skip_val], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };
        tx.commit()?;
        Ok((total, raws))
      })
      .await?;

    Ok(RecordPage {
      total:   total as u64,
      records: raws
        .into_iter()
        .map(RawRecord::into_record)
        .collect::<Result<_>>()?,
    })
  }

  async fn list_by_label(&self, label: Label) -> Result<Vec<ClassificationRecord>> {
    let flag = label.flag();

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM klasifikasi
           WHERE hasil = ?1
           ORDER BY id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![flag], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn label_counts(&self) -> Result<LabelCounts> {
    let (total, healthy, diseased): (i64, i64, i64) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*),
                  COALESCE(SUM(hasil = 1), 0),
                  COALESCE(SUM(hasil = 0), 0)
           FROM klasifikasi",
          [],
          |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?)
      })
      .await?;

    Ok(LabelCounts {
      total:    total as u64,
      healthy:  healthy as u64,
      diseased: diseased as u64,
    })
  }

  async fn paths(&self) -> Result<Vec<String>> {
    let paths = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT path FROM klasifikasi")?;
        let rows = stmt
          .query_map([], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(paths)
  }
}
