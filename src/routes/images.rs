use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use super::json_body;
use crate::response::AppError;
use crate::services::word_images::WordImagesError;
use crate::state::AppState;

/// `POST /get_images` with `{"word": "..."}`.
pub async fn get_images(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(payload)?;
    let word = body
        .get("word")
        .and_then(Value::as_str)
        .filter(|word| !word.trim().is_empty())
        .ok_or(WordImagesError::MissingInput)?;

    let resolved = state.word_images().resolve(word).await?;
    Ok(Json(resolved))
}
