use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use snip_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use snip_core::{ShortCode, StorageError, UniqueColumn};

/// In-memory implementation of the Repository trait using DashMap.
///
/// Two indexes are kept, one per unique column. Reads go straight to the
/// sharded maps. Inserts take `write_lock` so that checking both indexes and
/// filling them happens as one step; without it two racing inserts could each
/// pass the checks and leave the indexes disagreeing.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    by_short: DashMap<String, String>,
    by_original: DashMap<String, String>,
    write_lock: Mutex<()>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_short: DashMap::with_capacity(capacity),
            by_original: DashMap::with_capacity(capacity),
            write_lock: Mutex::new(()),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_short.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_short(&self, code: &str) -> Result<Option<UrlRecord>> {
        Ok(self.by_short.get(code).map(|original| UrlRecord {
            original_url: original.value().clone(),
            short_code: ShortCode::new_unchecked(code),
        }))
    }

    async fn find_by_original(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        Ok(self.by_original.get(original_url).map(|short| UrlRecord {
            original_url: original_url.to_owned(),
            short_code: ShortCode::new_unchecked(short.value().as_str()),
        }))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: UrlRecord) -> Result<()> {
        let _guard = self.write_lock.lock();

        if self.by_original.contains_key(&record.original_url) {
            return Err(StorageError::Conflict {
                column: UniqueColumn::Original,
                value: record.original_url,
            });
        }
        if self.by_short.contains_key(record.short_code.as_str()) {
            return Err(StorageError::Conflict {
                column: UniqueColumn::Short,
                value: record.short_code.to_string(),
            });
        }

        let short = String::from(record.short_code);
        self.by_short.insert(short.clone(), record.original_url.clone());
        self.by_original.insert(record.original_url, short);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(url: &str, code: &str) -> UrlRecord {
        UrlRecord {
            original_url: url.to_string(),
            short_code: ShortCode::new_unchecked(code),
        }
    }

    #[tokio::test]
    async fn insert_and_find_both_ways() {
        let repo = InMemoryRepository::new();

        repo.insert(record("https://example.com", "abc123"))
            .await
            .unwrap();

        let by_short = repo.find_by_short("abc123").await.unwrap().unwrap();
        assert_eq!(by_short.original_url, "https://example.com");

        let by_original = repo
            .find_by_original("https://example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_original.short_code.as_str(), "abc123");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn find_nonexistent() {
        let repo = InMemoryRepository::with_capacity(16);

        assert!(repo.find_by_short("nope00").await.unwrap().is_none());
        assert!(repo.find_by_original("https://x").await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn short_code_conflict() {
        let repo = InMemoryRepository::new();

        repo.insert(record("https://one.example", "abc123"))
            .await
            .unwrap();
        let err = repo
            .insert(record("https://two.example", "abc123"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StorageError::Conflict {
                column: UniqueColumn::Short,
                ..
            }
        ));
        assert!(repo
            .find_by_original("https://two.example")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn original_url_conflict() {
        let repo = InMemoryRepository::new();

        repo.insert(record("https://example.com", "abc123"))
            .await
            .unwrap();
        let err = repo
            .insert(record("https://example.com", "def456"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StorageError::Conflict {
                column: UniqueColumn::Original,
                ..
            }
        ));
        assert!(repo.find_by_short("def456").await.unwrap().is_none());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn originals_are_opaque() {
        let repo = InMemoryRepository::new();

        repo.insert(record("https://Example.com/", "aaaaaa"))
            .await
            .unwrap();
        repo.insert(record("https://example.com", "bbbbbb"))
            .await
            .unwrap();
        repo.insert(record("", "cccccc")).await.unwrap();

        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_url_leave_one_mapping() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..16u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(record("https://same.example", &format!("code{:02}", i)))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len(), 1);
    }
}
