//! Handler for `GET /`, the liveness probe.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status:    &'static str,
  pub message:   &'static str,
  pub timestamp: DateTime<Utc>,
}

/// `GET /`
pub async fn handler() -> Json<HealthResponse> {
  Json(HealthResponse {
    status:    "success",
    message:   "API Klasifikasi Cabai Aktif!",
    timestamp: Utc::now(),
  })
}
