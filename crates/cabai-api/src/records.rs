//! Handlers for `/klasifikasi` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/klasifikasi` | `?skip` (default 0), `?limit` (default 100, capped) |
//! | `GET`  | `/klasifikasi/{id}` | 404 if not found |
//! | `GET`  | `/klasifikasi/status/{hasil}` | `hasil` must be 0 or 1 |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use cabai_core::{
  blob::BlobStore,
  query::DEFAULT_PAGE_SIZE,
  record::{ClassificationRecord, RecordPage},
  store::RecordStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub skip:  u64,
  #[serde(default = "default_limit")]
  pub limit: u64,
}

fn default_limit() -> u64 { DEFAULT_PAGE_SIZE }

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub status: &'static str,
  #[serde(flatten)]
  pub page:   RecordPage,
}

/// `GET /klasifikasi[?skip=<n>][&limit=<n>]`
pub async fn list<R, B>(
  State(state): State<AppState<R, B>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError>
where
  R: RecordStore + 'static,
  B: BlobStore + 'static,
{
  let Query(params) = params?;
  let page = state.query.list(params.skip, params.limit).await?;
  Ok(Json(ListResponse { status: "success", page }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RecordResponse {
  pub status: &'static str,
  pub data:   ClassificationRecord,
}

/// `GET /klasifikasi/{id}`
pub async fn get_one<R, B>(
  State(state): State<AppState<R, B>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<RecordResponse>, ApiError>
where
  R: RecordStore + 'static,
  B: BlobStore + 'static,
{
  let Path(id) = id?;
  let record = state.query.get(id).await?;
  Ok(Json(RecordResponse { status: "success", data: record }))
}

// ─── Filter by label ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FilterResponse {
  pub status:     &'static str,
  /// e.g. `"Status Sehat"`.
  pub filter:     String,
  pub total_data: usize,
  pub data:       Vec<ClassificationRecord>,
}

/// `GET /klasifikasi/status/{hasil}`
pub async fn by_status<R, B>(
  State(state): State<AppState<R, B>>,
  hasil: Result<Path<i64>, PathRejection>,
) -> Result<Json<FilterResponse>, ApiError>
where
  R: RecordStore + 'static,
  B: BlobStore + 'static,
{
  let Path(hasil) = hasil?;
  let (label, records) = state.query.by_label(hasil).await?;
  Ok(Json(FilterResponse {
    status:     "success",
    filter:     format!("Status {label}"),
    total_data: records.len(),
    data:       records,
  }))
}
