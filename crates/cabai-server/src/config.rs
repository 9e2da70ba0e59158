//! Runtime server configuration.
//!
//! Read from an optional TOML file, then overridden by `CABAI_*` environment
//! variables (e.g. `CABAI_PORT=9000`). Every key has a default.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use cabai_api::{ApiConfig, DEFAULT_MAX_UPLOAD_BYTES};
use cabai_core::query::MAX_PAGE_SIZE;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_database_path")]
  pub database_path:    PathBuf,
  /// Directory holding uploaded images.
  #[serde(default = "default_upload_dir")]
  pub upload_dir:       PathBuf,
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes: usize,
  #[serde(default = "default_max_page_size")]
  pub max_page_size:    u64,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_database_path() -> PathBuf { PathBuf::from("klasifikasi.db") }
fn default_upload_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_max_upload_bytes() -> usize { DEFAULT_MAX_UPLOAD_BYTES }
fn default_max_page_size() -> u64 { MAX_PAGE_SIZE }

impl ServerConfig {
  /// Layer `path` (if it exists) under the environment and deserialise.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CABAI").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {path:?}"))?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.database_path = expand_tilde(&cfg.database_path);
    cfg.upload_dir = expand_tilde(&cfg.upload_dir);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      max_page_size:    self.max_page_size,
      max_upload_bytes: self.max_upload_bytes,
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.upload_dir, PathBuf::from("uploads"));
    assert_eq!(cfg.database_path, PathBuf::from("klasifikasi.db"));
    assert_eq!(cfg.max_page_size, 1000);
    assert_eq!(cfg.max_upload_bytes, 10 * 1024 * 1024);
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
      file,
      "host = \"127.0.0.1\"\nport = 9001\nupload_dir = \"/srv/cabai/uploads\"\nmax_page_size = 50"
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:9001");
    assert_eq!(cfg.upload_dir, PathBuf::from("/srv/cabai/uploads"));
    assert_eq!(cfg.api_config().max_page_size, 50);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/cabai/uploads")),
      PathBuf::from(home).join("cabai/uploads")
    );
    assert_eq!(expand_tilde(Path::new("uploads")), PathBuf::from("uploads"));
  }
}
