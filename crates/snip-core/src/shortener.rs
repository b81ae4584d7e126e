use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code for `original_url`, creating the mapping on
    /// first submission and reusing it afterwards.
    async fn shorten(&self, original_url: &str) -> Result<ShortCode>;

    /// Resolves a short code to the original URL it was created for.
    async fn resolve(&self, code: &str) -> Result<String>;
}
