use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::{ErrorKind, ShortenerError};
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal,
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => AppError::NotFound("short code not found".to_string()),
            ErrorKind::StorageFailure | ErrorKind::GenerationExhausted => {
                error!(error = %err, kind = ?err.kind(), "shortener request failed");
                AppError::Internal
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
