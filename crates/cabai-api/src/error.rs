//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"status": "error", "detail": "..."}` with the HTTP
//! status carrying the class of failure.

use axum::{
  Json,
  extract::{
    multipart::{MultipartError, MultipartRejection},
    rejection::{PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  PayloadTooLarge(String),

  #[error("{0}")]
  Internal(String),
}

impl From<cabai_core::Error> for ApiError {
  fn from(e: cabai_core::Error) -> Self {
    use cabai_core::Error;
    match e {
      Error::Validation(v) => ApiError::BadRequest(v.to_string()),
      Error::NotFound(_) => ApiError::NotFound(e.to_string()),
      Error::RecordStore(_) | Error::BlobStore(_) => {
        ApiError::Internal(format!("Error: {e}"))
      }
    }
  }
}

impl From<MultipartError> for ApiError {
  fn from(e: MultipartError) -> Self {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
      ApiError::PayloadTooLarge(e.body_text())
    } else {
      ApiError::BadRequest(e.body_text())
    }
  }
}

impl From<MultipartRejection> for ApiError {
  fn from(e: MultipartRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::Internal(m) => {
        tracing::error!(error = %m, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let body = json!({ "status": "error", "detail": self.to_string() });
    (status, Json(body)).into_response()
  }
}
