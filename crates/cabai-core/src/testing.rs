//! In-memory `RecordStore` and `BlobStore` fakes for service tests.

use std::{
  collections::HashMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  },
};

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;

use crate::{
  blob::{BlobKey, BlobStore, StagedBlob},
  record::{ClassificationRecord, Label, LabelCounts, NewRecord, RecordPage},
  store::RecordStore,
};

#[derive(Debug, Error)]
#[error("injected failure: {0}")]
pub struct FakeError(&'static str);

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryRecordStore {
  rows:         Mutex<Vec<ClassificationRecord>>,
  fail_inserts: AtomicBool,
}

impl MemoryRecordStore {
  pub fn fail_inserts(&self) { self.fail_inserts.store(true, Ordering::SeqCst); }

  pub fn len(&self) -> usize { self.rows.lock().unwrap().len() }

  fn newest_first(&self) -> Vec<ClassificationRecord> {
    let mut rows = self.rows.lock().unwrap().clone();
    rows.sort_by(|a, b| b.id.cmp(&a.id));
    rows
  }
}

impl RecordStore for MemoryRecordStore {
  type Error = FakeError;

  async fn insert(&self, input: NewRecord) -> Result<ClassificationRecord, FakeError> {
    if self.fail_inserts.load(Ordering::SeqCst) {
      return Err(FakeError("insert"));
    }
    let mut rows = self.rows.lock().unwrap();
    let now = Utc::now();
    let record = ClassificationRecord {
      id:         rows.len() as i64 + 1,
      path:       input.path,
      label:      input.label,
      created_at: now,
      updated_at: now,
    };
    rows.push(record.clone());
    Ok(record)
  }

  async fn get(&self, id: i64) -> Result<Option<ClassificationRecord>, FakeError> {
    Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
  }

  async fn list(&self, skip: u64, limit: u64) -> Result<RecordPage, FakeError> {
    let rows = self.newest_first();
    Ok(RecordPage {
      total:   rows.len() as u64,
      records: rows
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect(),
    })
  }

  async fn list_by_label(
    &self,
    label: Label,
  ) -> Result<Vec<ClassificationRecord>, FakeError> {
    let mut rows = self.newest_first();
    rows.retain(|r| r.label == label);
    Ok(rows)
  }

  async fn label_counts(&self) -> Result<LabelCounts, FakeError> {
    let rows = self.rows.lock().unwrap();
    let healthy = rows.iter().filter(|r| r.label == Label::Healthy).count() as u64;
    Ok(LabelCounts {
      total: rows.len() as u64,
      healthy,
      diseased: rows.len() as u64 - healthy,
    })
  }

  async fn paths(&self) -> Result<Vec<String>, FakeError> {
    Ok(self.rows.lock().unwrap().iter().map(|r| r.path.clone()).collect())
  }
}

// ─── Blobs ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryBlobStore {
  staged:         Mutex<HashMap<BlobKey, Bytes>>,
  published:      Mutex<HashMap<BlobKey, Bytes>>,
  fail_stages:    AtomicBool,
  fail_publishes: AtomicBool,
}

impl MemoryBlobStore {
  pub fn fail_stages(&self) { self.fail_stages.store(true, Ordering::SeqCst); }

  pub fn fail_publishes(&self) { self.fail_publishes.store(true, Ordering::SeqCst); }

  pub fn staged_count(&self) -> usize { self.staged.lock().unwrap().len() }

  pub fn published_keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self
      .published
      .lock()
      .unwrap()
      .keys()
      .map(|k| k.to_string())
      .collect();
    keys.sort();
    keys
  }
}

impl BlobStore for MemoryBlobStore {
  type Error = FakeError;

  async fn stage(&self, key: BlobKey, bytes: Bytes) -> Result<StagedBlob, FakeError> {
    if self.fail_stages.load(Ordering::SeqCst) {
      return Err(FakeError("stage"));
    }
    let size = bytes.len() as u64;
    self.staged.lock().unwrap().insert(key.clone(), bytes);
    Ok(StagedBlob { key, size })
  }

  async fn publish(&self, staged: StagedBlob) -> Result<BlobKey, FakeError> {
    let bytes = self.staged.lock().unwrap().remove(&staged.key);
    if self.fail_publishes.load(Ordering::SeqCst) {
      return Err(FakeError("publish"));
    }
    let bytes = bytes.ok_or(FakeError("publish of unknown blob"))?;
    self.published.lock().unwrap().insert(staged.key.clone(), bytes);
    Ok(staged.key)
  }

  async fn discard<'a>(&'a self, key: &'a BlobKey) -> Result<(), FakeError> {
    self.published.lock().unwrap().remove(key);
    Ok(())
  }

  async fn list(&self) -> Result<Vec<BlobKey>, FakeError> {
    Ok(self.published.lock().unwrap().keys().cloned().collect())
  }
}
