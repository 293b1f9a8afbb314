use async_trait::async_trait;
use jiff::Timestamp;
use keyhole_core::{ReadStore, RecordStore, ShortCode, StoreError, UrlRecord};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

type Result<T> = std::result::Result<T, StoreError>;

/// MySQL implementation of the record-store contract.
///
/// The `UNIQUE KEY` on `short_code` is the authoritative uniqueness
/// backstop for code generation: an insert losing a race with another
/// allocator maps to `StoreError::Conflict`. Rows are never filtered on
/// expiry; the engine owns that policy. The auto-increment `id` orders
/// the recency listing and arbitrates first-wins dedup lookups.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_expires_at(seconds: Option<i64>) -> Result<Option<Timestamp>> {
    seconds
        .map(|value| {
            Timestamp::from_second(value).map_err(|e| {
                StoreError::InvalidData(format!("invalid expires_at timestamp '{}': {e}", value))
            })
        })
        .transpose()
}

fn row_to_record(row: &MySqlRow) -> Result<UrlRecord> {
    let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
    let clicks: u64 = row.try_get("clicks").map_err(map_sqlx_error)?;
    let expires_at_raw: Option<i64> = row.try_get("expires_at").map_err(map_sqlx_error)?;

    Ok(UrlRecord {
        long_url,
        clicks,
        expires_at: parse_expires_at(expires_at_raw)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[async_trait]
impl ReadStore for MySqlStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT long_url, clicks, expires_at
            FROM url_records
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM url_records
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn find_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Option<(ShortCode, UrlRecord)>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, long_url, clicks, expires_at
            FROM url_records
            WHERE long_url = ?
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
        let record = row_to_record(&row)?;

        Ok(Some((ShortCode::new_unchecked(short_code), record)))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<(ShortCode, UrlRecord)>> {
        let rows = sqlx::query(
            r#"
            SELECT short_code, long_url, clicks, expires_at
            FROM url_records
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as u64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                let short_code: String =
                    row.try_get("short_code").map_err(map_sqlx_error)?;
                let record = row_to_record(row)?;
                Ok((ShortCode::new_unchecked(short_code), record))
            })
            .collect()
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        let expires_at = record.expires_at.map(|ts| ts.as_second());

        let result = sqlx::query(
            r#"
            INSERT INTO url_records (short_code, long_url, clicks, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(code.as_str())
        .bind(record.long_url)
        .bind(record.clicks)
        .bind(expires_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::Conflict(code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<()> {
        // Single-statement increment: atomic on the server, no
        // read-modify-write window for lost updates.
        sqlx::query(
            r#"
            UPDATE url_records
            SET clicks = clicks + 1
            WHERE short_code = ?
            "#,
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM url_records")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
