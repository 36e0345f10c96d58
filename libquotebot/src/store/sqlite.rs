//! SQLite quote store
//!
//! Reads the `quotes` table through an sqlx pool. Used for local runs and as a
//! substitute for the document store.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::time::Duration;
use tracing::info;

use crate::config::TimeoutConfig;
use crate::error::{QuotebotError, Result, StoreError};
use crate::store::{with_deadline, QuoteStore};
use crate::types::Quote;

const TABLE: &str = "quotes";

#[derive(Clone)]
pub struct SqliteQuoteStore {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl SqliteQuoteStore {
    /// Open a pool for `url` and make sure the schema exists
    ///
    /// A single connection is used, which also keeps `sqlite::memory:`
    /// databases consistent across queries.
    pub async fn connect(url: &str, timeouts: &TimeoutConfig) -> Result<Self> {
        info!("Initialising SQLite connection");

        let pool = with_deadline("connect", timeouts.connect(), async {
            SqlitePoolOptions::new()
                .max_connections(1)
                .acquire_timeout(timeouts.connect())
                .connect(url)
                .await
                .map_err(|e| QuotebotError::from(StoreError::Connection(e.to_string())))
        })
        .await?;

        let store = Self::from_pool(pool, timeouts).await?;
        info!("Connected to SQLite!");
        Ok(store)
    }

    /// Wrap an existing pool, running the schema migration
    pub async fn from_pool(pool: SqlitePool, timeouts: &TimeoutConfig) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(StoreError::Migration)?;

        Ok(Self {
            pool,
            query_timeout: timeouts.query(),
        })
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn count(&self) -> Result<u64> {
        let count = with_deadline("count", self.query_timeout, async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| QuotebotError::from(map_sqlx_error(e)))
        })
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn fetch_at(&self, offset: u64) -> Result<Option<Quote>> {
        let offset = i64::try_from(offset)
            .map_err(|_| StoreError::Query(format!("offset {} out of range", offset)))?;

        let row = with_deadline("find", self.query_timeout, async {
            sqlx::query(
                r#"
                SELECT id, quote_text, author
                FROM quotes LIMIT 1 OFFSET ?
                "#,
            )
            .bind(offset)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| QuotebotError::from(map_sqlx_error(e)))
        })
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| StoreError::Decode(e.to_string());
        let id: i64 = row.try_get("id").map_err(decode)?;
        let text: String = row.try_get("quote_text").map_err(decode)?;
        let author: String = row.try_get("author").map_err(decode)?;

        Ok(Some(Quote::new(text, author).with_id(id.to_string())))
    }

    fn collection(&self) -> &str {
        TABLE
    }
}

fn map_sqlx_error(error: sqlx::Error) -> StoreError {
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Connection(error.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => StoreError::Decode(error.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}
