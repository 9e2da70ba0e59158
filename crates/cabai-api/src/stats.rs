//! Handler for `GET /statistik`.

use axum::{Json, extract::State};
use cabai_core::{blob::BlobStore, record::Statistics, store::RecordStore};
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
  pub status: &'static str,
  pub data:   Statistics,
}

/// `GET /statistik`
pub async fn handler<R, B>(
  State(state): State<AppState<R, B>>,
) -> Result<Json<StatisticsResponse>, ApiError>
where
  R: RecordStore + 'static,
  B: BlobStore + 'static,
{
  let stats = state.query.statistics().await?;
  Ok(Json(StatisticsResponse { status: "success", data: stats }))
}
