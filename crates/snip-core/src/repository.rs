use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::error::StorageError;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored mapping between an original URL and its short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original URL, stored byte for byte as submitted.
    pub original_url: String,
    /// The code the URL is reachable under.
    pub short_code: ShortCode,
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the mapping for a given short code.
    /// Returns `None` if the code does not exist.
    async fn find_by_short(&self, code: &str) -> Result<Option<UrlRecord>>;

    /// Retrieves the mapping for a given original URL.
    /// Returns `None` if the URL has never been shortened.
    async fn find_by_original(&self, original_url: &str) -> Result<Option<UrlRecord>>;
}

/// Durable storage of URL mappings.
///
/// Implementations must enforce uniqueness of both the original URL and the
/// short code inside the storage layer itself, so that concurrent inserts
/// are arbitrated even across processes.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new mapping.
    ///
    /// Returns `Err(StorageError::Conflict { .. })` naming the offending
    /// column if either the original URL or the short code already exists.
    async fn insert(&self, record: UrlRecord) -> Result<()>;
}
