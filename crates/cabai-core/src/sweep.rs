//! Reconciliation between the blob store and the record store.

use std::collections::HashSet;

use crate::{
  Error, Result,
  blob::{BlobKey, BlobStore},
  store::RecordStore,
};

/// Published blobs that no record references, sorted by key.
///
/// Blobs are listed before record paths are read, so a blob whose record is
/// committed between the two reads is reported as referenced. An ingestion
/// still in flight may show up here; callers deleting the result should allow
/// for that.
pub async fn unreferenced_blobs<R, B>(records: &R, blobs: &B) -> Result<Vec<BlobKey>>
where
  R: RecordStore,
  B: BlobStore,
{
  let keys = blobs.list().await.map_err(|e| Error::BlobStore(Box::new(e)))?;
  let referenced: HashSet<String> = records
    .paths()
    .await
    .map_err(|e| Error::RecordStore(Box::new(e)))?
    .into_iter()
    .collect();

  let mut orphans: Vec<BlobKey> = keys
    .into_iter()
    .filter(|key| !referenced.contains(key.as_str()))
    .collect();
  orphans.sort();
  Ok(orphans)
}
