use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the HTTP routes. Any path not matched below is resolved as a
    /// short code.
    pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/shorten", post(shorten_handler))
            .nest_service("/static", ServeDir::new(static_dir.as_ref()))
            .fallback(redirect_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }
}
