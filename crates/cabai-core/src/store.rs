//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `cabai-store-sqlite`). The services
//! in this crate and the HTTP layer depend on this abstraction only.

use std::future::Future;

use crate::record::{ClassificationRecord, Label, LabelCounts, NewRecord, RecordPage};

/// Abstraction over the relational table of classification records.
///
/// Every method is one isolated unit of work: implementations must not share
/// a transaction between calls. Records are insert-only.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new record and return it with its assigned `id` and
  /// timestamps.
  fn insert(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<ClassificationRecord, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ClassificationRecord>, Self::Error>>
  + Send
  + '_;

  /// Records ordered by `id` descending, skipping `skip` and returning at most
  /// `limit`, together with the total count. Both are read in one
  /// transaction.
  fn list(
    &self,
    skip: u64,
    limit: u64,
  ) -> impl Future<Output = Result<RecordPage, Self::Error>> + Send + '_;

  /// Every record carrying `label`, ordered by `id` descending.
  fn list_by_label(
    &self,
    label: Label,
  ) -> impl Future<Output = Result<Vec<ClassificationRecord>, Self::Error>>
  + Send
  + '_;

  /// Total, healthy and diseased counts from a single consistent read.
  fn label_counts(
    &self,
  ) -> impl Future<Output = Result<LabelCounts, Self::Error>> + Send + '_;

  /// The `path` of every record.
  fn paths(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
