use axum::http::header::HOST;
use axum::http::HeaderMap;
use snip_core::Shortener;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: Option<String>,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: Option<String>) -> Self {
        Self {
            shortener,
            base_url: public_base_url.map(|url| url.trim_end_matches('/').to_owned()),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// The base short URLs are built on: the configured public base URL, or
    /// `http://<Host>` taken from the request.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(base_url) = &self.base_url {
            return base_url.clone();
        }

        let host = headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{host}")
    }
}
