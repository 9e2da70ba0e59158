//! The filesystem implementation of [`BlobStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use bytes::Bytes;
use cabai_core::blob::{BlobKey, BlobStore, StagedBlob};
use tokio::{fs, io::AsyncWriteExt as _};

use crate::{Error, Result};

/// Name of the staging sub-directory inside the blob root.
pub const STAGING_DIR: &str = ".staging";

/// A blob store rooted at a directory.
///
/// Cloning is cheap; the paths are reference-counted.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
  root:    Arc<Path>,
  staging: Arc<Path>,
}

impl FsBlobStore {
  /// Open (or create) a store at `root`, including its staging directory.
  pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
    let root = root.as_ref().to_path_buf();
    let staging = root.join(STAGING_DIR);
    fs::create_dir_all(&staging)
      .await
      .map_err(Error::io(&staging))?;

    let store = Self { root: root.into(), staging: staging.into() };
    tracing::debug!(root = ?store.root, "blob store opened");
    Ok(store)
  }

  pub fn root(&self) -> &Path { &self.root }

  /// Location of the published blob `key`.
  pub fn path_of(&self, key: &BlobKey) -> PathBuf { self.root.join(key.as_str()) }

  fn staged_path_of(&self, key: &BlobKey) -> PathBuf {
    self.staging.join(key.as_str())
  }

  /// Remove every staged file, returning how many were removed. Other
  /// entries are left alone.
  ///
  /// Staged files are never referenced by a record. Only call this while no
  /// ingestion is running against the same directory, e.g. at startup.
  pub async fn clear_staging(&self) -> Result<usize> {
    let mut removed = 0;
    let mut entries = fs::read_dir(&self.staging)
      .await
      .map_err(Error::io(&*self.staging))?;
    while let Some(entry) = entries
      .next_entry()
      .await
      .map_err(Error::io(&*self.staging))?
    {
      let path = entry.path();
      let is_file = entry
        .file_type()
        .await
        .map_err(Error::io(&path))?
        .is_file();
      if !is_file {
        tracing::warn!(?path, "ignoring non-file entry in staging directory");
        continue;
      }
      tracing::warn!(?path, "removing unpublished staged blob");
      remove_if_present(&path).await?;
      removed += 1;
    }
    Ok(removed)
  }
}

/// Remove `path`, treating an already-missing file as success.
async fn remove_if_present(path: &Path) -> Result<()> {
  match fs::remove_file(path).await {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
    Err(e) => Err(Error::Io { path: path.to_path_buf(), source: e }),
  }
}

async fn write_fully(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
  let mut file = fs::File::create(path).await?;
  file.write_all(bytes).await?;
  file.sync_all().await
}

// ─── BlobStore impl ──────────────────────────────────────────────────────────

impl BlobStore for FsBlobStore {
  type Error = Error;

  async fn stage(&self, key: BlobKey, bytes: Bytes) -> Result<StagedBlob> {
    let path = self.staged_path_of(&key);
    if let Err(source) = write_fully(&path, &bytes).await {
      if let Err(e) = remove_if_present(&path).await {
        tracing::warn!(error = %e, "could not remove partial staged blob");
      }
      return Err(Error::Io { path, source });
    }
    Ok(StagedBlob { key, size: bytes.len() as u64 })
  }

  async fn publish(&self, staged: StagedBlob) -> Result<BlobKey> {
    let from = self.staged_path_of(&staged.key);
    let to = self.path_of(&staged.key);
    if let Err(source) = fs::rename(&from, &to).await {
      if let Err(e) = remove_if_present(&from).await {
        tracing::warn!(error = %e, "could not remove staged blob after failed publish");
      }
      return Err(Error::Io { path: to, source });
    }
    tracing::debug!(key = %staged.key, size = staged.size, "blob published");
    Ok(staged.key)
  }

  async fn discard<'a>(&'a self, key: &'a BlobKey) -> Result<()> {
    remove_if_present(&self.path_of(key)).await?;
    tracing::debug!(%key, "blob discarded");
    Ok(())
  }

  async fn list(&self) -> Result<Vec<BlobKey>> {
    let mut keys = Vec::new();
    let mut entries = fs::read_dir(&self.root)
      .await
      .map_err(Error::io(&*self.root))?;
    while let Some(entry) = entries
      .next_entry()
      .await
      .map_err(Error::io(&*self.root))?
    {
      let is_file = entry
        .file_type()
        .await
        .map_err(Error::io(entry.path()))?
        .is_file();
      let key = entry.file_name().to_str().and_then(BlobKey::parse);
      match key {
        Some(key) if is_file => keys.push(key),
        _ => {}
      }
    }
    Ok(keys)
  }
}
