//! Quote store abstraction and backends
//!
//! A store exposes two primitives, a record count and an unordered skip scan.
//! [`random_quote`] builds uniform sampling on top of them: count N, draw an
//! offset in `[0, N)`, skip that many records and decode the next one.
//!
//! # Examples
//!
//! ```no_run
//! use libquotebot::store::{self, random_quote};
//! use libquotebot::Config;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! # async fn example() -> libquotebot::Result<()> {
//! let config = Config::load()?;
//! let store = store::connect(&config.database, &config.timeouts).await?;
//!
//! let mut rng = StdRng::from_entropy();
//! let quote = random_quote(store.as_ref(), &mut rng).await?;
//! println!("{} - {}", quote.text, quote.author);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::config::{DatabaseConfig, TimeoutConfig};
use crate::error::{ConfigError, Result, StoreError};
use crate::types::Quote;

pub mod memory;
pub mod mongo;
pub mod sqlite;

pub use memory::MemoryQuoteStore;
pub use mongo::MongoQuoteStore;
pub use sqlite::SqliteQuoteStore;

/// Read access to a collection of quotes
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Number of quotes currently stored
    async fn count(&self) -> Result<u64>;

    /// Skip `offset` records of an unordered scan and decode the next one
    ///
    /// Returns `None` if the scan ran past the end of the collection.
    async fn fetch_at(&self, offset: u64) -> Result<Option<Quote>>;

    /// Collection (or table) name, used in error messages
    fn collection(&self) -> &str;
}

/// Draw a uniform offset in `[0, count)`, or `None` for an empty collection
pub fn pick_offset<R: Rng + ?Sized>(count: u64, rng: &mut R) -> Option<u64> {
    if count == 0 {
        None
    } else {
        Some(rng.gen_range(0..count))
    }
}

/// Select one quote with approximately equal probability per record
///
/// # Errors
///
/// - `StoreError::Empty` if the collection holds no quotes
/// - `StoreError::Missing` if records were removed between count and scan
/// - any connection, query, decode or timeout error from the store
pub async fn random_quote<S, R>(store: &S, rng: &mut R) -> Result<Quote>
where
    S: QuoteStore + ?Sized,
    R: Rng + Send + ?Sized,
{
    let count = store.count().await?;
    let offset = pick_offset(count, rng)
        .ok_or_else(|| StoreError::Empty(store.collection().to_string()))?;

    debug!(count, offset, collection = store.collection(), "sampling quote");

    let quote = store
        .fetch_at(offset)
        .await?
        .ok_or_else(|| StoreError::Missing {
            collection: store.collection().to_string(),
            offset,
        })?;

    Ok(quote)
}

/// Connect to the store named by the database URL
///
/// `mongodb://` and `mongodb+srv://` select MongoDB, `sqlite:` selects SQLite.
pub async fn connect(
    database: &DatabaseConfig,
    timeouts: &TimeoutConfig,
) -> Result<Box<dyn QuoteStore>> {
    let url = database.url.as_str();

    if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
        let store = MongoQuoteStore::connect(database, timeouts).await?;
        Ok(Box::new(store))
    } else if url.starts_with("sqlite:") {
        let store = SqliteQuoteStore::connect(url, timeouts).await?;
        Ok(Box::new(store))
    } else {
        let scheme = url.split(':').next().unwrap_or(url);
        Err(ConfigError::UnsupportedDatabase(scheme.to_string()).into())
    }
}

/// Run one store round trip under its own deadline
pub(crate) async fn with_deadline<T, F>(
    operation: &'static str,
    deadline: Duration,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| StoreError::Timeout {
            operation,
            seconds: deadline.as_secs(),
        })?
}
