//! Error types for Quotebot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuotebotError>;

#[derive(Error, Debug)]
pub enum QuotebotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl QuotebotError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            QuotebotError::InvalidInput(_) => 3,
            QuotebotError::Platform(PlatformError::Authentication(_)) => 2,
            QuotebotError::Platform(_) => 1,
            QuotebotError::Config(_) => 1,
            QuotebotError::Store(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedDatabase(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("No quotes found in '{0}'")]
    Empty(String),

    #[error("No quote at offset {offset} in '{collection}'")]
    Missing { collection: String, offset: u64 },

    #[error("Failed to decode quote: {0}")]
    Decode(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = QuotebotError::InvalidInput("Quote text is empty".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_authentication_error() {
        let error = QuotebotError::Platform(PlatformError::Authentication(
            "Invalid or expired token".to_string(),
        ));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_other_failures() {
        let posting = QuotebotError::Platform(PlatformError::Posting("too long".to_string()));
        let network = QuotebotError::Platform(PlatformError::Network("refused".to_string()));
        let rate_limit = QuotebotError::Platform(PlatformError::RateLimit("429".to_string()));
        let config = QuotebotError::Config(ConfigError::MissingField("CONSUMER_KEY".to_string()));
        let empty = QuotebotError::Store(StoreError::Empty("quotes".to_string()));

        assert_eq!(posting.exit_code(), 1);
        assert_eq!(network.exit_code(), 1);
        assert_eq!(rate_limit.exit_code(), 1);
        assert_eq!(config.exit_code(), 1);
        assert_eq!(empty.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting_config() {
        let error = QuotebotError::Config(ConfigError::MissingField("ACCESS_TOKEN".to_string()));
        assert_eq!(
            error.to_string(),
            "Configuration error: Missing required field: ACCESS_TOKEN"
        );
    }

    #[test]
    fn test_error_message_formatting_store() {
        let error = QuotebotError::Store(StoreError::Empty("quotes".to_string()));
        assert_eq!(error.to_string(), "Store error: No quotes found in 'quotes'");

        let timeout = StoreError::Timeout {
            operation: "count",
            seconds: 10,
        };
        assert_eq!(timeout.to_string(), "count timed out after 10s");

        let missing = StoreError::Missing {
            collection: "quotes".to_string(),
            offset: 4,
        };
        assert_eq!(missing.to_string(), "No quote at offset 4 in 'quotes'");
    }

    #[test]
    fn test_error_message_formatting_platform() {
        let error = QuotebotError::Platform(PlatformError::Posting(
            "Twitter post failed (403): text too long".to_string(),
        ));
        assert_eq!(
            error.to_string(),
            "Platform error: Posting failed: Twitter post failed (403): text too long"
        );
    }

    #[test]
    fn test_error_conversions() {
        let from_config: QuotebotError = ConfigError::MissingField("x".to_string()).into();
        assert!(matches!(from_config, QuotebotError::Config(_)));

        let from_store: QuotebotError = StoreError::Decode("bad".to_string()).into();
        assert!(matches!(from_store, QuotebotError::Store(_)));

        let from_platform: QuotebotError = PlatformError::Network("x".to_string()).into();
        assert!(matches!(from_platform, QuotebotError::Platform(_)));
    }

    #[test]
    fn test_unsupported_database_formatting() {
        let error = ConfigError::UnsupportedDatabase("postgres".to_string());
        assert_eq!(
            error.to_string(),
            "Unsupported database URL scheme: postgres"
        );
    }
}
