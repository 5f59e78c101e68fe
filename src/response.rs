use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::documents::DocumentError;
use crate::services::pictograms::PictogramError;
use crate::services::word_images::WordImagesError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "MISSING_INPUT", message)
    }

    /// A 500 whose message is safe to show to the editor, e.g. a file that
    /// could not be written.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", message)
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::INTERNAL_SERVER_ERROR, "CORRUPT_DATA", message)
    }

    fn operational(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.message,
            code: self.code,
        };

        (self.status, Json(body)).into_response()
    }
}

pub fn json_error(
    status: StatusCode,
    code: impl Into<String>,
    message: impl Into<String>,
) -> AppError {
    AppError::operational(status, code, message)
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::MissingInput(message) => Self::missing_input(message),
            DocumentError::InvalidName(_) => Self::bad_request(err.to_string()),
            DocumentError::NotFound(message) => Self::not_found(message),
            DocumentError::Conflict(_) => Self::conflict(err.to_string()),
            DocumentError::Corrupt(_) => Self::corrupt(err.to_string()),
            DocumentError::File(_) | DocumentError::Io { .. } => {
                tracing::error!(error = %err, "document storage failed");
                Self::storage(err.to_string())
            }
        }
    }
}

impl From<WordImagesError> for AppError {
    fn from(err: WordImagesError) -> Self {
        match err {
            WordImagesError::MissingInput => Self::missing_input(err.to_string()),
            WordImagesError::NotFound { .. } => Self::not_found(err.to_string()),
            WordImagesError::Pictogram(PictogramError::InvalidTerm(_)) => {
                Self::bad_request(err.to_string())
            }
            WordImagesError::Pictogram(PictogramError::NoImagesFound(_)) => {
                Self::not_found("No images found for the word")
            }
            WordImagesError::Pictogram(_) | WordImagesError::Persist(_) => {
                tracing::error!(error = %err, "word image resolution failed");
                Self::storage(err.to_string())
            }
        }
    }
}
