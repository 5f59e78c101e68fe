use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use serde_json::json;

use crate::response::{json_error, AppError};
use crate::state::AppState;

const SYMBOL_FIELD: &str = "symbol";

/// `POST /upload-images`, multipart with the image in the `symbol` field.
pub async fn upload_images(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "upload without multipart body");
        AppError::missing_input("No file uploaded")
    })?;

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(SYMBOL_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(AppError::missing_input("No file uploaded"));
    };

    state.documents().store_symbol(&filename, &data).await?;
    Ok(Json(json!({ "filename": filename })))
}

/// Keeps the status axum assigns, e.g. 413 once the body limit is hit.
fn multipart_error(err: MultipartError) -> AppError {
    let status = err.status();
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "PAYLOAD_TOO_LARGE"
    } else {
        "BAD_REQUEST"
    };
    tracing::debug!(%status, error = %err.body_text(), "multipart upload rejected");
    json_error(status, code, err.body_text())
}
