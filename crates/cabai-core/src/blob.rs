//! The `BlobStore` trait and blob keys.
//!
//! Images live outside the database. A blob is first *staged* (written in
//! full somewhere readers cannot see it), then *published* under its final
//! key. Only published keys are ever referenced by a record.

use std::{fmt, future::Future};

use bytes::Bytes;
use uuid::Uuid;

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Storage key of a blob: `<uuid>.<extension>`.
///
/// Keys are generated per upload and never derived from client filenames.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlobKey(String);

impl BlobKey {
  /// A fresh key carrying `extension`, which must already be validated.
  pub fn generate(extension: &str) -> Self {
    Self(format!("{}.{extension}", Uuid::new_v4().simple()))
  }

  /// Accept an existing key, e.g. a file name read back from disk.
  ///
  /// Returns `None` for anything that is not a single visible path component.
  pub fn parse(raw: &str) -> Option<Self> {
    let valid = !raw.is_empty()
      && !raw.starts_with('.')
      && !raw.contains(['/', '\\']);
    valid.then(|| Self(raw.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for BlobKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// A blob that has been written completely but is not yet visible.
#[derive(Debug)]
pub struct StagedBlob {
  pub key:  BlobKey,
  pub size: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the image store.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Write `bytes` in full under `key` without publishing it.
  fn stage(
    &self,
    key: BlobKey,
    bytes: Bytes,
  ) -> impl Future<Output = Result<StagedBlob, Self::Error>> + Send + '_;

  /// Atomically make a staged blob visible under its key.
  ///
  /// On failure the staged data is removed.
  fn publish(
    &self,
    staged: StagedBlob,
  ) -> impl Future<Output = Result<BlobKey, Self::Error>> + Send + '_;

  /// Remove a published blob. Removing a missing blob succeeds.
  fn discard<'a>(
    &'a self,
    key: &'a BlobKey,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every published key, in no particular order.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<BlobKey>, Self::Error>> + Send + '_;
}
