use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::response::AppError;
use crate::services::documents::SelectedImages;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveSelectionRequest {
    sentence: String,
    image_names: Vec<String>,
}

/// Failures answer with a 500 and `success: false`, like every other
/// endpoint, instead of a 200 carrying a failure flag.
pub async fn save_selected_images(
    State(state): State<AppState>,
    payload: Result<Json<SaveSelectionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "invalid selection payload");
        AppError::bad_request("Failed to save sentence and image names.")
    })?;

    let entry = SelectedImages {
        sentence: request.sentence,
        image_names: request.image_names,
    };

    if let Err(err) = state.documents().append_selection(entry).await {
        tracing::error!(error = %err, "failed to save selected images");
        return Err(AppError::storage("Failed to save sentence and image names."));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Sentence and image names saved successfully!"
    })))
}

pub async fn clear_selected_images(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    state.documents().clear_selections().await?;
    Ok(Json(json!({ "status": "success", "message": "Data cleared" })))
}
