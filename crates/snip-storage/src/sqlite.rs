use async_trait::async_trait;
use snip_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use snip_core::{ShortCode, StorageError, UniqueColumn};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/sqlite/urls.sql");

/// SQLite implementation of the repository contract.
///
/// Both `original` and `short` carry a `UNIQUE` constraint, so the database
/// arbitrates racing inserts and reports which column rejected them.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing SQLite connection pool.
    ///
    /// The schema is not applied; call [`SqliteRepository::migrate`] if the
    /// pool points at a fresh database.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `database_url` and applies
    /// the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        debug!(database_url, "sqlite repository ready");
        Ok(repository)
    }

    /// Creates the `urls` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Number of stored mappings.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM urls")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.try_get("total").map_err(map_sqlx_error)
    }

    /// Closes every pooled connection. Further calls fail with `Unavailable`.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn find_one(&self, sql: &str, value: &str) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let original_url: String = row.try_get("original").map_err(map_sqlx_error)?;
        let short: String = row.try_get("short").map_err(map_sqlx_error)?;

        Ok(Some(UrlRecord {
            original_url,
            short_code: ShortCode::new_unchecked(short),
        }))
    }
}

/// Returns the column named by a unique violation, if `err` is one.
fn unique_violation(err: &sqlx::Error) -> Option<UniqueColumn> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }

    // SQLite reports "UNIQUE constraint failed: urls.<column>".
    let message = db_err.message();
    if message.contains("urls.original") {
        Some(UniqueColumn::Original)
    } else if message.contains("urls.short") {
        Some(UniqueColumn::Short)
    } else {
        None
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn find_by_short(&self, code: &str) -> Result<Option<UrlRecord>> {
        self.find_one(
            r#"
            SELECT original, short
            FROM urls
            WHERE short = ?1
            LIMIT 1
            "#,
            code,
        )
        .await
    }

    async fn find_by_original(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        self.find_one(
            r#"
            SELECT original, short
            FROM urls
            WHERE original = ?1
            LIMIT 1
            "#,
            original_url,
        )
        .await
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, record: UrlRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO urls (original, short)
            VALUES (?1, ?2)
            "#,
        )
        .bind(&record.original_url)
        .bind(record.short_code.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => match unique_violation(&err) {
                Some(UniqueColumn::Original) => Err(StorageError::Conflict {
                    column: UniqueColumn::Original,
                    value: record.original_url,
                }),
                Some(UniqueColumn::Short) => Err(StorageError::Conflict {
                    column: UniqueColumn::Short,
                    value: record.short_code.to_string(),
                }),
                None => Err(map_sqlx_error(err)),
            },
        }
    }
}
