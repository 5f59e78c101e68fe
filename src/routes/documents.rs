use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use super::json_body;
use crate::response::AppError;
use crate::state::AppState;

pub async fn save_questions(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let questions = json_body(payload)?;
    state.documents().save_questions(&questions).await?;
    Ok(Json(json!({ "message": "Data saved successfully" })))
}

pub async fn save_match(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let match_set = json_body(payload)?;
    state.documents().save_match(&match_set).await?;
    Ok(Json(json!({ "message": "Data saved successfully" })))
}

pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    match state.documents().load_settings().await {
        Ok(settings) => Ok(Json(settings)),
        Err(err) => {
            tracing::error!(error = %err, "failed to load quiz settings");
            Err(AppError::storage(format!("Failed to load settings: {err}")))
        }
    }
}

pub async fn save_settings(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let settings = json_body(payload)?;
    if let Err(err) = state.documents().save_settings(&settings).await {
        tracing::error!(error = %err, "failed to save quiz settings");
        return Err(AppError::storage(format!("Failed to save settings: {err}")));
    }
    Ok(Json(json!({ "success": true })))
}
