//! Handler for `POST /upload`.
//!
//! Multipart fields:
//!
//! | Field | Notes |
//! |-------|-------|
//! | `file` | The image; its filename must end in jpg, jpeg, png or bmp |
//! | `hasil` | `1` = Sehat, `0` = Sakit |

use axum::{
  Json,
  extract::{Multipart, State, multipart::MultipartRejection},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use cabai_core::{
  blob::BlobStore, ingest::Upload, record::ClassificationRecord, store::RecordStore,
};
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub status:  &'static str,
  pub message: &'static str,
  pub data:    ClassificationRecord,
}

/// `POST /upload`: returns 201 with the committed record.
///
/// The body is read in full before anything is written. Ingestion then runs
/// in its own task, so a client hanging up cannot stop it between the blob
/// write and the record insert.
pub async fn handler<R, B>(
  State(state): State<AppState<R, B>>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  R: RecordStore + 'static,
  B: BlobStore + 'static,
{
  let upload = read_upload(multipart?).await?;
  tracing::debug!(
    filename = %upload.filename,
    label = upload.label,
    size = upload.bytes.len(),
    "upload received"
  );

  let ingestor = state.ingestor.clone();
  let record = tokio::spawn(async move { ingestor.ingest(upload).await })
    .await
    .map_err(|e| ApiError::Internal(format!("Error: ingestion task failed: {e}")))??;

  Ok((
    StatusCode::CREATED,
    Json(UploadResponse {
      status:  "success",
      message: "Data berhasil disimpan",
      data:    record,
    }),
  ))
}

/// Collect the `file` and `hasil` fields; unknown fields are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
  let mut file: Option<(String, Bytes)> = None;
  let mut label: Option<i64> = None;

  while let Some(field) = multipart.next_field().await? {
    let name = field.name().unwrap_or_default().to_owned();
    match name.as_str() {
      "file" => {
        let filename = field
          .file_name()
          .map(str::to_owned)
          .ok_or_else(|| ApiError::BadRequest("Field 'file' harus berupa berkas".into()))?;
        file = Some((filename, field.bytes().await?));
      }
      "hasil" => {
        let text = field.text().await?;
        let value = text.trim().parse::<i64>().map_err(|_| {
          ApiError::BadRequest(format!(
            "Nilai hasil harus berupa bilangan bulat, bukan {text:?}"
          ))
        })?;
        label = Some(value);
      }
      _ => {}
    }
  }

  let (filename, bytes) =
    file.ok_or_else(|| ApiError::BadRequest("Field 'file' wajib diisi".into()))?;
  let label =
    label.ok_or_else(|| ApiError::BadRequest("Field 'hasil' wajib diisi".into()))?;
  Ok(Upload { filename, label, bytes })
}
