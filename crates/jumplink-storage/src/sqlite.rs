use async_trait::async_trait;
use jumplink_core::error::{Result, StorageError};
use jumplink_core::repository::{Page, ReadRepository, Repository};
use jumplink_core::{LinkRecord, ShortCode};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteRow, SqliteSynchronous};
use sqlx::{Connection, Row, SqliteConnection};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS urls (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        long_url  TEXT    NOT NULL,
        short_url TEXT    NOT NULL,
        hits      INTEGER NOT NULL DEFAULT 0
    )
"#;

const CREATE_INDEX_SQL: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_short_url ON urls (short_url)";

// Lookups match `lower(short_url)` so rows written with upper-case codes
// stay reachable.
const CREATE_LOWER_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_short_url_lower ON urls (lower(short_url))";

/// SQLite implementation of the repository contract.
///
/// Every operation opens its own connection, runs a single statement and
/// closes the connection again; nothing is pooled between calls. A unique
/// index on `short_url` turns concurrent inserts of the same code into a
/// [`StorageError::Conflict`] instead of a duplicate row.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    options: SqliteConnectOptions,
}

impl SqliteRepository {
    /// Opens (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path.as_ref());
        Self::with_options(options).await
    }

    /// Opens the database named by a `sqlite://` URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url).map_err(map_sqlx_error)?;
        Self::with_options(options).await
    }

    /// Creates a repository from explicit connect options and makes sure the
    /// schema exists.
    pub async fn with_options(options: SqliteConnectOptions) -> Result<Self> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let repository = Self { options };
        repository.create_schema().await?;

        info!(
            database = %repository.options.get_filename().display(),
            "opened sqlite link store"
        );

        Ok(repository)
    }

    async fn connection(&self) -> Result<SqliteConnection> {
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_schema(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        let result = async {
            sqlx::query(CREATE_TABLE_SQL).execute(&mut conn).await?;
            sqlx::query(CREATE_INDEX_SQL).execute(&mut conn).await?;
            sqlx::query(CREATE_LOWER_INDEX_SQL).execute(&mut conn).await
        }
        .await;

        release(conn).await;
        result.map_err(map_sqlx_error)?;
        Ok(())
    }
}

/// Closes a connection; a failed close is logged, the statement already ran.
async fn release(conn: SqliteConnection) {
    if let Err(err) = conn.close().await {
        warn!(error = %err, "failed to close sqlite connection");
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::Io(_) => StorageError::Io(message),
        sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn record_from_row(row: &SqliteRow) -> Result<LinkRecord> {
    let short_url: String = row.try_get("short_url").map_err(map_sqlx_error)?;
    let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
    let hits: i64 = row.try_get("hits").map_err(map_sqlx_error)?;

    let hits = u64::try_from(hits).map_err(|_| {
        StorageError::InvalidData(format!("negative hit count {hits} for '{short_url}'"))
    })?;

    Ok(LinkRecord {
        short_code: ShortCode::new_unchecked(short_url.to_ascii_lowercase()),
        long_url,
        hits,
    })
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let mut conn = self.connection().await?;

        let row = sqlx::query(
            r#"
            SELECT short_url, long_url, hits
            FROM urls
            WHERE lower(short_url) = ?1
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&mut conn)
        .await;

        release(conn).await;

        row.map_err(map_sqlx_error)?
            .map(|row| record_from_row(&row))
            .transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let mut conn = self.connection().await?;

        let row = sqlx::query("SELECT 1 FROM urls WHERE lower(short_url) = ?1 LIMIT 1")
            .bind(code.as_str())
            .fetch_optional(&mut conn)
            .await;

        release(conn).await;

        Ok(row.map_err(map_sqlx_error)?.is_some())
    }

    async fn list(&self) -> Result<Vec<LinkRecord>> {
        let mut conn = self.connection().await?;

        let rows = sqlx::query("SELECT short_url, long_url, hits FROM urls ORDER BY id ASC")
            .fetch_all(&mut conn)
            .await;

        release(conn).await;

        rows.map_err(map_sqlx_error)?
            .iter()
            .map(record_from_row)
            .collect()
    }

    async fn list_page(&self, page: Page) -> Result<Vec<LinkRecord>> {
        let limit = i64::from(page.size());
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let mut conn = self.connection().await?;

        let rows = sqlx::query(
            r#"
            SELECT short_url, long_url, hits
            FROM (
                SELECT id, short_url, long_url, hits
                FROM urls
                ORDER BY id DESC
                LIMIT ?1 OFFSET ?2
            )
            ORDER BY id ASC
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut conn)
        .await;

        release(conn).await;

        rows.map_err(map_sqlx_error)?
            .iter()
            .map(record_from_row)
            .collect()
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, record: &LinkRecord) -> Result<()> {
        let mut conn = self.connection().await?;

        let result = sqlx::query("INSERT INTO urls (long_url, short_url, hits) VALUES (?1, ?2, 0)")
            .bind(record.long_url.as_str())
            .bind(record.short_code.as_str())
            .execute(&mut conn)
            .await;

        release(conn).await;

        match result {
            Ok(_) => {
                debug!(code = %record.short_code, "inserted link row");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.short_code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn record_hit(&self, code: &ShortCode) -> Result<()> {
        let mut conn = self.connection().await?;

        let result = sqlx::query("UPDATE urls SET hits = hits + 1 WHERE lower(short_url) = ?1")
            .bind(code.as_str())
            .execute(&mut conn)
            .await;

        release(conn).await;

        let updated = result.map_err(map_sqlx_error)?.rows_affected();
        debug!(code = %code, updated, "recorded hit");
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let mut conn = self.connection().await?;

        let result = sqlx::query("DELETE FROM urls WHERE lower(short_url) = ?1")
            .bind(code.as_str())
            .execute(&mut conn)
            .await;

        release(conn).await;

        Ok(result.map_err(map_sqlx_error)?.rows_affected() > 0)
    }
}
