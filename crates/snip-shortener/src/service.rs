use crate::store::{CodeStore, CodeStoreSettings};
use async_trait::async_trait;
use snip_core::{Operation, Repository, ShortCode, Shortener, ShortenerError};
use snip_generator::Generator;
use std::sync::Arc;

/// A concrete implementation of the `Shortener` trait.
///
/// The service delegates to a [`CodeStore`] and tags errors with the
/// operation that failed. The error's [`snip_core::ErrorKind`] is preserved.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    store: Arc<CodeStore<R, G>>,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a service over a new store with default settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::from_store(CodeStore::new(repository, generator))
    }

    pub fn with_settings(repository: R, generator: G, settings: CodeStoreSettings) -> Self {
        Self::from_store(CodeStore::with_settings(repository, generator, settings))
    }

    pub fn from_store(store: CodeStore<R, G>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &CodeStore<R, G> {
        &self.store
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, original_url: &str) -> Result<ShortCode, ShortenerError> {
        self.store
            .shorten(original_url)
            .await
            .map_err(|e| ShortenerError::new(Operation::Shorten, e))
    }

    async fn resolve(&self, code: &str) -> Result<String, ShortenerError> {
        self.store
            .resolve(code)
            .await
            .map_err(|e| ShortenerError::new(Operation::Resolve, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_core::{ErrorKind, StoreError};
    use snip_generator::{RandomGenerator, SeqGenerator};
    use snip_storage::InMemoryRepository;

    fn test_service() -> ShortenerService<InMemoryRepository, RandomGenerator> {
        ShortenerService::new(InMemoryRepository::new(), RandomGenerator::new())
    }

    #[tokio::test]
    async fn example_scenario() {
        let service = test_service();

        let c1 = service.shorten("https://example.com/a").await.unwrap();
        assert_eq!(c1.as_str().len(), 6);
        assert!(c1.as_str().chars().all(|c| c.is_ascii_alphanumeric()));

        let resolved = service.resolve(c1.as_str()).await.unwrap();
        assert_eq!(resolved, "https://example.com/a");

        let again = service.shorten("https://example.com/a").await.unwrap();
        assert_eq!(again, c1);

        let err = service.resolve("zzzzzz").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn resolve_error_is_tagged_with_operation() {
        let service = test_service();

        let err = service.resolve("abc123").await.unwrap_err();

        assert_eq!(err.operation(), Operation::Resolve);
        assert!(matches!(err.store_error(), StoreError::NotFound(_)));
        assert_eq!(
            err.to_string(),
            "resolve url: short code not found: abc123"
        );
    }

    #[tokio::test]
    async fn exhaustion_is_tagged_with_shorten() {
        let repository = InMemoryRepository::new();
        repository
            .insert(snip_core::UrlRecord {
                original_url: "https://taken.example".into(),
                short_code: ShortCode::new_unchecked("000000"),
            })
            .await
            .unwrap();
        let settings = CodeStoreSettings::builder().max_attempts(1).build();
        let service = ShortenerService::with_settings(repository, SeqGenerator::new(), settings);

        let err = service.shorten("https://example.com").await.unwrap_err();

        assert_eq!(err.operation(), Operation::Shorten);
        assert_eq!(err.kind(), ErrorKind::GenerationExhausted);
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let service: Arc<dyn Shortener> = Arc::new(test_service());

        let code = service.shorten("https://example.com").await.unwrap();
        assert_eq!(
            service.resolve(code.as_str()).await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn clones_share_the_store() {
        let service = test_service();
        let clone = service.clone();

        let code = service.shorten("https://example.com").await.unwrap();

        assert_eq!(
            clone.resolve(code.as_str()).await.unwrap(),
            "https://example.com"
        );
        assert_eq!(clone.store().repository().len(), 1);
    }
}
