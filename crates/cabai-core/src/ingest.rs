//! The ingestion path: validate → stage blob → publish blob → commit record.
//!
//! A record is only inserted once its blob is fully written and published, so
//! a committed record never points at a missing blob. If the insert fails the
//! published blob is discarded again. A crash between publish and commit (or a
//! failed discard) leaves an orphan blob; see [`crate::sweep`].

use std::sync::Arc;

use bytes::Bytes;

use crate::{
  Error, Result,
  blob::{BlobKey, BlobStore},
  record::{ClassificationRecord, Label, NewRecord},
  store::RecordStore,
  validate::image_extension,
};

/// An image upload as received from the device.
#[derive(Debug, Clone)]
pub struct Upload {
  /// Client-supplied file name; only its extension is used.
  pub filename: String,
  /// Raw label, validated to `0` or `1`.
  pub label:    i64,
  pub bytes:    Bytes,
}

/// Validates uploads and persists them across the blob and record stores.
pub struct Ingestor<R, B> {
  records: Arc<R>,
  blobs:   Arc<B>,
}

impl<R, B> Ingestor<R, B>
where
  R: RecordStore,
  B: BlobStore,
{
  pub fn new(records: Arc<R>, blobs: Arc<B>) -> Self { Self { records, blobs } }

  /// Ingest one upload, returning the committed record.
  ///
  /// Validation failures return [`Error::Validation`] before anything is
  /// written.
  pub async fn ingest(&self, upload: Upload) -> Result<ClassificationRecord> {
    let extension = image_extension(&upload.filename)?;
    let label = Label::from_flag(upload.label)?;

    let staged = self
      .blobs
      .stage(BlobKey::generate(&extension), upload.bytes)
      .await
      .map_err(|e| Error::BlobStore(Box::new(e)))?;
    let key = self
      .blobs
      .publish(staged)
      .await
      .map_err(|e| Error::BlobStore(Box::new(e)))?;

    let input = NewRecord { path: key.as_str().to_owned(), label };
    match self.records.insert(input).await {
      Ok(record) => {
        tracing::info!(
          id = record.id,
          path = %record.path,
          label = %record.label,
          original = %upload.filename,
          "classification recorded"
        );
        Ok(record)
      }
      Err(e) => {
        if let Err(cleanup) = self.blobs.discard(&key).await {
          tracing::error!(
            %key,
            error = %cleanup,
            "could not discard blob after failed insert; blob is orphaned"
          );
        }
        Err(Error::RecordStore(Box::new(e)))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    ValidationError,
    testing::{MemoryBlobStore, MemoryRecordStore},
  };

  fn upload(filename: &str, label: i64) -> Upload {
    Upload {
      filename: filename.into(),
      label,
      bytes: Bytes::from_static(b"\xff\xd8\xff\xe0fake-jpeg"),
    }
  }

  fn ingestor() -> (
    Ingestor<MemoryRecordStore, MemoryBlobStore>,
    Arc<MemoryRecordStore>,
    Arc<MemoryBlobStore>,
  ) {
    let records = Arc::new(MemoryRecordStore::default());
    let blobs = Arc::new(MemoryBlobStore::default());
    (Ingestor::new(records.clone(), blobs.clone()), records, blobs)
  }

  #[tokio::test]
  async fn valid_upload_stores_blob_and_record() {
    let (ingestor, records, blobs) = ingestor();

    let record = ingestor.ingest(upload("cabai.JPG", 1)).await.unwrap();
    assert_eq!(record.id, 1);
    assert_eq!(record.label, Label::Healthy);
    assert!(record.path.ends_with(".jpg"), "path: {}", record.path);
    assert_eq!(record.created_at, record.updated_at);

    assert_eq!(blobs.published_keys(), vec![record.path.clone()]);
    assert_eq!(records.get(record.id).await.unwrap(), Some(record));
  }

  #[tokio::test]
  async fn identical_filenames_get_distinct_blobs() {
    let (ingestor, _, blobs) = ingestor();

    let a = ingestor.ingest(upload("capture.jpg", 1)).await.unwrap();
    let b = ingestor.ingest(upload("capture.jpg", 0)).await.unwrap();
    assert_ne!(a.path, b.path);
    assert_eq!(blobs.published_keys().len(), 2);
  }

  #[tokio::test]
  async fn bad_extension_has_no_side_effects() {
    let (ingestor, records, blobs) = ingestor();

    let err = ingestor.ingest(upload("notes.txt", 1)).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Validation(ValidationError::UnsupportedExtension(_))
    ));
    assert!(blobs.published_keys().is_empty());
    assert_eq!(blobs.staged_count(), 0);
    assert_eq!(records.len(), 0);
  }

  #[tokio::test]
  async fn bad_label_has_no_side_effects() {
    let (ingestor, records, blobs) = ingestor();

    let err = ingestor.ingest(upload("cabai.png", 2)).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Validation(ValidationError::InvalidLabel(2))
    ));
    assert!(blobs.published_keys().is_empty());
    assert_eq!(records.len(), 0);
  }

  #[tokio::test]
  async fn failed_insert_discards_published_blob() {
    let (ingestor, records, blobs) = ingestor();
    records.fail_inserts();

    let err = ingestor.ingest(upload("cabai.png", 0)).await.unwrap_err();
    assert!(matches!(err, Error::RecordStore(_)));
    assert!(blobs.published_keys().is_empty());
    assert_eq!(records.len(), 0);
  }

  #[tokio::test]
  async fn failed_stage_creates_no_record() {
    let (ingestor, records, blobs) = ingestor();
    blobs.fail_stages();

    let err = ingestor.ingest(upload("cabai.jpeg", 0)).await.unwrap_err();
    assert!(matches!(err, Error::BlobStore(_)));
    assert_eq!(blobs.staged_count(), 0);
    assert!(blobs.published_keys().is_empty());
    assert_eq!(records.len(), 0);
  }

  #[tokio::test]
  async fn failed_publish_creates_no_record() {
    let (ingestor, records, blobs) = ingestor();
    blobs.fail_publishes();

    let err = ingestor.ingest(upload("cabai.bmp", 1)).await.unwrap_err();
    assert!(matches!(err, Error::BlobStore(_)));
    assert_eq!(blobs.staged_count(), 0);
    assert_eq!(records.len(), 0);
  }
}
