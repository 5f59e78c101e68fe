mod documents;
mod health;
mod images;
mod sentences;
mod symbols;

use axum::extract::rejection::JsonRejection;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::response::{json_error, AppError};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let upload_limit = state.upload_limit();

    let mut app = Router::new()
        .route(
            "/save-json",
            post(documents::save_questions).fallback(method_not_allowed),
        )
        .route(
            "/match-save",
            post(documents::save_match).fallback(method_not_allowed),
        )
        .route(
            "/settings_quiz",
            get(documents::get_settings).fallback(method_not_allowed),
        )
        .route(
            "/save_settings",
            post(documents::save_settings).fallback(method_not_allowed),
        )
        .route(
            "/get_images",
            post(images::get_images).fallback(method_not_allowed),
        )
        .route(
            "/save_selected_images",
            post(sentences::save_selected_images).fallback(method_not_allowed),
        )
        .route(
            "/clear-selected-images",
            delete(sentences::clear_selected_images).fallback(method_not_allowed),
        )
        .route(
            "/upload-images",
            post(symbols::upload_images)
                .layer(DefaultBodyLimit::max(upload_limit))
                .fallback(method_not_allowed),
        );

    app = app.nest("/health", health::router());

    app.fallback(fallback_handler).with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into JSON errors.
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found").into_response()
}

/// Known path, unsupported method.
pub(crate) async fn method_not_allowed() -> Response {
    json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        "Method not allowed",
    )
    .into_response()
}
