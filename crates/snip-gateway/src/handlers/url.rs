use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};

pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload
        .map_err(|rejection| AppError::BadRequest(format!("invalid request body: {rejection}")))?;

    if request.url.trim().is_empty() {
        return Err(AppError::BadRequest("url must not be empty".to_string()));
    }

    let code = state.shortener().shorten(&request.url).await?;
    debug!(code = %code, "shortened url");

    Ok(Json(ShortenResponse {
        short_url: code.to_url(&state.base_url(&headers)),
        short_code: code.into(),
    }))
}

/// Treats the request path as a short code and redirects to its target.
pub async fn redirect_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let code = uri.path().strip_prefix('/').unwrap_or(uri.path());

    let original_url = state.shortener().resolve(code).await?;
    let location = HeaderValue::from_str(&original_url).map_err(|err| {
        error!(code, error = %err, "stored url is not a valid location header");
        AppError::Internal
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response())
}
