//! JSON REST API for the chili classification service.
//!
//! Exposes an axum [`Router`] backed by any [`RecordStore`] + [`BlobStore`]
//! pair. TLS and transport concerns are the caller's responsibility.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Liveness probe |
//! | `POST` | `/upload` | Multipart `file` + `hasil`; 201 + record |
//! | `GET`  | `/klasifikasi` | Paginated list, newest first |
//! | `GET`  | `/klasifikasi/{id}` | Single record |
//! | `GET`  | `/klasifikasi/status/{hasil}` | Records with one label |
//! | `GET`  | `/statistik` | Counts and percentages |

pub mod error;
pub mod health;
pub mod records;
pub mod stats;
pub mod upload;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use cabai_core::{
  blob::BlobStore,
  ingest::Ingestor,
  query::{MAX_PAGE_SIZE, QueryService},
  store::RecordStore,
};

pub use error::ApiError;

/// Default cap on the `POST /upload` request body.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Limits applied by the router.
#[derive(Debug, Clone, Copy)]
pub struct ApiConfig {
  /// Largest page `GET /klasifikasi` will return, whatever `limit` says.
  pub max_page_size:    u64,
  pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      max_page_size:    MAX_PAGE_SIZE,
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<R, B> {
  pub ingestor: Arc<Ingestor<R, B>>,
  pub query:    Arc<QueryService<R>>,
}

impl<R, B> Clone for AppState<R, B> {
  fn clone(&self) -> Self {
    Self {
      ingestor: Arc::clone(&self.ingestor),
      query:    Arc::clone(&self.query),
    }
  }
}

impl<R, B> AppState<R, B>
where
  R: RecordStore,
  B: BlobStore,
{
  pub fn new(records: Arc<R>, blobs: Arc<B>, config: &ApiConfig) -> Self {
    Self {
      ingestor: Arc::new(Ingestor::new(records.clone(), blobs)),
      query:    Arc::new(
        QueryService::new(records).with_max_page_size(config.max_page_size),
      ),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router over `records` and `blobs`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R, B>(records: Arc<R>, blobs: Arc<B>, config: ApiConfig) -> Router<()>
where
  R: RecordStore + 'static,
  B: BlobStore + 'static,
{
  let state = AppState::new(records, blobs, &config);

  Router::new()
    .route("/", get(health::handler))
    .route(
      "/upload",
      post(upload::handler::<R, B>)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
    )
    .route("/klasifikasi", get(records::list::<R, B>))
    .route("/klasifikasi/{id}", get(records::get_one::<R, B>))
    .route("/klasifikasi/status/{hasil}", get(records::by_status::<R, B>))
    .route("/statistik", get(stats::handler::<R, B>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
