//! MongoDB quote store
//!
//! Quotes live in one collection of documents shaped like
//! `{ _id, quoteText, author }`. Every round trip (connect, ping, count, find)
//! runs under its own deadline.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{DatabaseConfig, TimeoutConfig};
use crate::error::{QuotebotError, Result, StoreError};
use crate::store::{with_deadline, QuoteStore};
use crate::types::Quote;

const APP_NAME: &str = "quotebot";

/// Stored document layout
#[derive(Debug, Deserialize)]
struct QuoteDocument {
    #[serde(rename = "_id", default)]
    id: Option<Bson>,
    #[serde(
        rename = "quoteText",
        alias = "quotetext",
        alias = "quote_text",
        alias = "text"
    )]
    text: String,
    author: String,
}

impl From<QuoteDocument> for Quote {
    fn from(document: QuoteDocument) -> Self {
        let quote = Quote::new(document.text, document.author);
        match document.id {
            Some(Bson::ObjectId(oid)) => quote.with_id(oid.to_hex()),
            Some(Bson::String(id)) => quote.with_id(id),
            Some(other) => quote.with_id(other.to_string()),
            None => quote,
        }
    }
}

pub struct MongoQuoteStore {
    collection: Collection<Document>,
    name: String,
    query_timeout: Duration,
}

impl MongoQuoteStore {
    /// Connect, then ping the server so a bad URL fails here rather than on the first query
    pub async fn connect(database: &DatabaseConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        info!("Initialising MongoDB connection");

        let client = with_deadline("connect", timeouts.connect(), async {
            let mut options = ClientOptions::parse(database.url.as_str())
                .await
                .map_err(store_error)?;
            options.connect_timeout = Some(timeouts.connect());
            options.server_selection_timeout = Some(server_selection_timeout(timeouts));
            options
                .app_name
                .get_or_insert_with(|| APP_NAME.to_string());

            Client::with_options(options).map_err(store_error)
        })
        .await?;

        let db = client.database(&database.name);

        with_deadline("ping", timeouts.ping(), async {
            db.run_command(doc! { "ping": 1 })
                .await
                .map(|_| ())
                .map_err(store_error)
        })
        .await?;

        info!(
            database = %database.name,
            collection = %database.collection,
            "Connected to MongoDB!"
        );

        Ok(Self {
            collection: db.collection(&database.collection),
            name: database.collection.clone(),
            query_timeout: timeouts.query(),
        })
    }
}

#[async_trait]
impl QuoteStore for MongoQuoteStore {
    async fn count(&self) -> Result<u64> {
        with_deadline("count", self.query_timeout, async {
            self.collection
                .count_documents(doc! {})
                .await
                .map_err(store_error)
        })
        .await
    }

    async fn fetch_at(&self, offset: u64) -> Result<Option<Quote>> {
        let document = with_deadline("find", self.query_timeout, async {
            let mut cursor = self
                .collection
                .find(doc! {})
                .skip(offset)
                .limit(1)
                .await
                .map_err(store_error)?;

            cursor.try_next().await.map_err(store_error)
        })
        .await?;

        debug!(offset, found = document.is_some(), "find completed");

        document.map(decode_quote).transpose()
    }

    fn collection(&self) -> &str {
        &self.name
    }
}

/// Server selection gives up before the ping deadline, so an unreachable
/// server reports the driver's cause instead of a bare timeout.
fn server_selection_timeout(timeouts: &TimeoutConfig) -> Duration {
    timeouts.ping() * 3 / 4
}

fn decode_quote(document: Document) -> Result<Quote> {
    let decoded: QuoteDocument =
        bson::from_document(document).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(decoded.into())
}

fn store_error(error: mongodb::error::Error) -> QuotebotError {
    map_mongo_error(error).into()
}

fn map_mongo_error(error: mongodb::error::Error) -> StoreError {
    match *error.kind {
        ErrorKind::BsonDeserialization(_) => StoreError::Decode(error.to_string()),
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::InvalidTlsConfig { .. }
        | ErrorKind::Authentication { .. }
        | ErrorKind::InvalidArgument { .. } => StoreError::Connection(error.to_string()),
        _ => StoreError::Query(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use mongodb::error::Error;

    #[test]
    fn test_decode_camel_case_document() {
        let oid = ObjectId::new();
        let quote = decode_quote(doc! {
            "_id": oid,
            "quoteText": "Stay hungry",
            "author": "Anon",
        })
        .unwrap();

        assert_eq!(quote.text, "Stay hungry");
        assert_eq!(quote.author, "Anon");
        assert_eq!(quote.id, Some(oid.to_hex()));
    }

    #[test]
    fn test_decode_lowercase_field_names() {
        let quote = decode_quote(doc! {
            "quotetext": "Stay foolish",
            "author": "Anon",
        })
        .unwrap();

        assert_eq!(quote.text, "Stay foolish");
        assert_eq!(quote.id, None);
    }

    #[test]
    fn test_decode_string_id() {
        let quote = decode_quote(doc! {
            "_id": "q-1",
            "text": "Less is more",
            "author": "Mies",
        })
        .unwrap();

        assert_eq!(quote.id.as_deref(), Some("q-1"));
    }

    #[test]
    fn test_decode_missing_author_fails() {
        let result = decode_quote(doc! { "quoteText": "Orphan" });

        match result {
            Err(QuotebotError::Store(StoreError::Decode(message))) => {
                assert!(message.contains("author"))
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_wrong_type_fails() {
        let result = decode_quote(doc! { "quoteText": 42, "author": "Anon" });
        assert!(matches!(
            result,
            Err(QuotebotError::Store(StoreError::Decode(_)))
        ));
    }

    #[test]
    fn test_server_selection_ends_before_ping_deadline() {
        let timeouts = TimeoutConfig::default();
        assert_eq!(
            server_selection_timeout(&timeouts),
            Duration::from_millis(1500)
        );
        assert!(server_selection_timeout(&timeouts) < timeouts.ping());
    }

    #[test]
    fn test_io_error_is_connection() {
        let error = Error::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        assert!(matches!(map_mongo_error(error), StoreError::Connection(_)));
    }

    #[test]
    fn test_server_selection_error_is_connection() {
        let error = Error::from(ErrorKind::ServerSelection {
            message: "Server selection timeout: No available servers".to_string(),
        });

        match map_mongo_error(error) {
            StoreError::Connection(message) => assert!(message.contains("No available servers")),
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[test]
    fn test_other_driver_errors_are_query() {
        let error = Error::from(ErrorKind::InvalidResponse {
            message: "malformed reply".to_string(),
        });
        assert!(matches!(map_mongo_error(error), StoreError::Query(_)));
    }

    #[tokio::test]
    async fn test_refused_server_is_connection_error() {
        let database = DatabaseConfig {
            url: "mongodb://127.0.0.1:9/?directConnection=true".to_string(),
            name: "quotes-parser".to_string(),
            collection: "quotes".to_string(),
        };

        let result = MongoQuoteStore::connect(&database, &TimeoutConfig::default()).await;

        match result {
            Err(QuotebotError::Store(StoreError::Connection(_))) => {}
            Err(other) => panic!("expected connection error, got {other:?}"),
            Ok(_) => panic!("connected to a closed port"),
        }
    }
}
