//! Read-only queries over the record store.

use std::sync::Arc;

use crate::{
  Error, Result,
  record::{ClassificationRecord, Label, RecordPage, Statistics},
  store::RecordStore,
};

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Upper bound applied to any requested page size.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// The read side of the API. Every operation is pure.
pub struct QueryService<R> {
  records:       Arc<R>,
  max_page_size: u64,
}

impl<R: RecordStore> QueryService<R> {
  pub fn new(records: Arc<R>) -> Self {
    Self { records, max_page_size: MAX_PAGE_SIZE }
  }

  /// Override the cap applied to `limit` in [`Self::list`].
  pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
    self.max_page_size = max_page_size;
    self
  }

  /// Newest-first page of records plus the total record count.
  pub async fn list(&self, skip: u64, limit: u64) -> Result<RecordPage> {
    let limit = limit.min(self.max_page_size);
    self
      .records
      .list(skip, limit)
      .await
      .map_err(|e| Error::RecordStore(Box::new(e)))
  }

  pub async fn get(&self, id: i64) -> Result<ClassificationRecord> {
    self
      .records
      .get(id)
      .await
      .map_err(|e| Error::RecordStore(Box::new(e)))?
      .ok_or(Error::NotFound(id))
  }

  /// All records with the raw label `flag`, newest first.
  pub async fn by_label(
    &self,
    flag: i64,
  ) -> Result<(Label, Vec<ClassificationRecord>)> {
    let label = Label::from_flag(flag)?;
    let records = self
      .records
      .list_by_label(label)
      .await
      .map_err(|e| Error::RecordStore(Box::new(e)))?;
    Ok((label, records))
  }

  pub async fn statistics(&self) -> Result<Statistics> {
    let counts = self
      .records
      .label_counts()
      .await
      .map_err(|e| Error::RecordStore(Box::new(e)))?;
    Ok(Statistics::from_counts(counts))
  }
}
