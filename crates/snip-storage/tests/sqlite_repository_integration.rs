use snip_core::ShortCode;
use snip_storage::{
    ReadRepository, Repository, SqliteRepository, StorageError, UniqueColumn, UrlRecord,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

struct Fixture {
    repo: SqliteRepository,
}

impl Fixture {
    async fn start() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("open sqlite");

        let repo = SqliteRepository::new(pool);
        repo.migrate().await.expect("create schema");

        Self { repo }
    }
}

fn record(url: &str, code: &str) -> UrlRecord {
    UrlRecord {
        original_url: url.to_string(),
        short_code: ShortCode::new_unchecked(code),
    }
}

#[tokio::test]
async fn insert_and_find_by_both_columns() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(record("https://example.com/a", "abc123"))
        .await
        .unwrap();

    let by_short = fixture.repo.find_by_short("abc123").await.unwrap().unwrap();
    assert_eq!(by_short.original_url, "https://example.com/a");

    let by_original = fixture
        .repo
        .find_by_original("https://example.com/a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_original.short_code.as_str(), "abc123");
}

#[tokio::test]
async fn missing_rows_are_none() {
    let fixture = Fixture::start().await;

    assert!(fixture.repo.find_by_short("zzzzzz").await.unwrap().is_none());
    assert!(fixture
        .repo
        .find_by_original("https://never.example")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn insert_conflicts_on_short_code() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(record("https://one.example", "abc123"))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(record("https://two.example", "abc123"))
        .await
        .unwrap_err();

    match err {
        StorageError::Conflict { column, value } => {
            assert_eq!(column, UniqueColumn::Short);
            assert_eq!(value, "abc123");
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(fixture.repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn insert_conflicts_on_original_url() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(record("https://one.example", "abc123"))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(record("https://one.example", "def456"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StorageError::Conflict {
            column: UniqueColumn::Original,
            ..
        }
    ));
    assert!(fixture.repo.find_by_short("def456").await.unwrap().is_none());
}

#[tokio::test]
async fn originals_are_stored_verbatim() {
    let fixture = Fixture::start().await;
    let odd = "https://example.com/päth?q=a b&x=%20#frag";

    fixture.repo.insert(record(odd, "aaaaaa")).await.unwrap();
    fixture
        .repo
        .insert(record("https://EXAMPLE.com/päth?q=a b&x=%20#frag", "bbbbbb"))
        .await
        .unwrap();

    let got = fixture.repo.find_by_short("aaaaaa").await.unwrap().unwrap();
    assert_eq!(got.original_url, odd);
    assert_eq!(fixture.repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn short_code_lookup_is_case_sensitive() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(record("https://lower.example", "abcdef"))
        .await
        .unwrap();
    fixture
        .repo
        .insert(record("https://upper.example", "ABCDEF"))
        .await
        .unwrap();

    let lower = fixture.repo.find_by_short("abcdef").await.unwrap().unwrap();
    let upper = fixture.repo.find_by_short("ABCDEF").await.unwrap().unwrap();
    assert_eq!(lower.original_url, "https://lower.example");
    assert_eq!(upper.original_url, "https://upper.example");
}

#[tokio::test]
async fn concurrent_inserts_of_same_url_keep_one_row() {
    let fixture = Fixture::start().await;
    let repo = Arc::new(fixture.repo);
    let mut handles = vec![];

    for i in 0..8 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.insert(record("https://same.example", &format!("code0{i}")))
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(StorageError::Conflict {
                column: UniqueColumn::Original,
                ..
            }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn connect_applies_schema() {
    let repo = SqliteRepository::connect("sqlite::memory:").await.unwrap();

    repo.insert(record("https://example.com", "abc123"))
        .await
        .unwrap();
    assert_eq!(repo.count().await.unwrap(), 1);

    // Applying the schema again leaves existing rows alone.
    repo.migrate().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn closed_pool_reports_unavailable() {
    let fixture = Fixture::start().await;
    fixture.repo.close().await;

    let err = fixture.repo.find_by_short("abc123").await.unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
}
