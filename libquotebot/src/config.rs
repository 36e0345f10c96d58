//! Configuration management for Quotebot
//!
//! Non-secret settings come from an optional TOML file; the store URL and the
//! four API credentials come from the environment.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, QuotebotError, Result};
use crate::message::MessageConfig;

pub const DEFAULT_DATABASE_NAME: &str = "quotes-parser";
pub const DEFAULT_COLLECTION: &str = "quotes";
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const LEGACY_DATABASE_URL_VAR: &str = "MONGO_DB_URL";
pub const CONSUMER_KEY_VAR: &str = "CONSUMER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "CONSUMER_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "ACCESS_TOKEN_SECRET";

/// Fully resolved runtime configuration
#[derive(Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub twitter: TwitterConfig,
    pub message: MessageConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub collection: String,
}

#[derive(Debug)]
pub struct TwitterConfig {
    pub api_base: String,
    pub credentials: TwitterCredentials,
}

/// OAuth 1.0a user-context credentials
#[derive(Debug)]
pub struct TwitterCredentials {
    pub consumer_key: SecretString,
    pub consumer_secret: SecretString,
    pub access_token: SecretString,
    pub access_token_secret: SecretString,
}

/// Per-round-trip deadlines, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub connect_secs: u64,
    pub ping_secs: u64,
    pub query_secs: u64,
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            ping_secs: 2,
            query_secs: 10,
            request_secs: 10,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn ping(&self) -> Duration {
        Duration::from_secs(self.ping_secs)
    }

    pub fn query(&self) -> Duration {
        Duration::from_secs(self.query_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    /// Reject zero deadlines, which would fail every round trip
    fn validate(&self) -> Result<()> {
        for (field, secs) in [
            ("timeouts.connect_secs", self.connect_secs),
            ("timeouts.ping_secs", self.ping_secs),
            ("timeouts.query_secs", self.query_secs),
            ("timeouts.request_secs", self.request_secs),
        ] {
            if secs == 0 {
                return Err(invalid_value(field, "must be at least 1 second"));
            }
        }
        Ok(())
    }
}

/// Contents of the optional settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub twitter: TwitterSettings,
    pub message: MessageConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub name: String,
    pub collection: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            name: DEFAULT_DATABASE_NAME.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterSettings {
    pub api_base: String,
}

impl Default for TwitterSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let settings: Settings = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(settings)
    }
}

impl Config {
    /// Load configuration from the process environment and the default settings file
    ///
    /// `QUOTEBOT_CONFIG` names a settings file that must exist. Without it, the
    /// XDG location is used if present and defaults apply otherwise.
    pub fn load() -> Result<Self> {
        let settings = match std::env::var("QUOTEBOT_CONFIG") {
            Ok(path) => Settings::load_from_path(&expand_path(&path))?,
            Err(_) => match default_config_path() {
                Some(path) if path.exists() => Settings::load_from_path(&path)?,
                _ => Settings::default(),
            },
        };

        Self::from_lookup(settings, |key| std::env::var(key).ok())
    }

    /// Load configuration using an explicit settings file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let settings = Settings::load_from_path(path)?;
        Self::from_lookup(settings, |key| std::env::var(key).ok())
    }

    /// Assemble configuration from settings and an environment lookup
    ///
    /// Every required value is checked here, so a missing credential fails
    /// before any connection is attempted.
    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        settings.timeouts.validate()?;
        if settings.message.character_limit == Some(0) {
            return Err(invalid_value(
                "message.character_limit",
                "must be greater than zero",
            ));
        }

        let url = non_empty(lookup(DATABASE_URL_VAR))
            .or_else(|| non_empty(lookup(LEGACY_DATABASE_URL_VAR)))
            .or_else(|| non_empty(settings.database.url.clone()))
            .ok_or_else(|| ConfigError::MissingField(DATABASE_URL_VAR.to_string()))?;

        let credentials = TwitterCredentials {
            consumer_key: required(&lookup, CONSUMER_KEY_VAR)?,
            consumer_secret: required(&lookup, CONSUMER_SECRET_VAR)?,
            access_token: required(&lookup, ACCESS_TOKEN_VAR)?,
            access_token_secret: required(&lookup, ACCESS_TOKEN_SECRET_VAR)?,
        };

        Ok(Self {
            database: DatabaseConfig {
                url,
                name: settings.database.name,
                collection: settings.database.collection,
            },
            twitter: TwitterConfig {
                api_base: settings.twitter.api_base.trim_end_matches('/').to_string(),
                credentials,
            },
            message: settings.message,
            timeouts: settings.timeouts,
        })
    }
}

fn invalid_value(field: &str, message: &str) -> QuotebotError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingField(key.to_string()).into())
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Default settings file location following the XDG Base Directory spec
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quotebot").join("config.toml"))
}
