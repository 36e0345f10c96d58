//! Twitter/X platform implementation
//!
//! Talks to the v2 API with OAuth 1.0a user-context signing:
//! `GET /2/users/me` to verify credentials and `POST /2/tweets` to publish.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{TimeoutConfig, TwitterConfig};
use crate::error::{ConfigError, PlatformError, Result};
use crate::platforms::oauth::OAuth1Signer;
use crate::platforms::Platform;
use crate::types::Account;

pub const TWITTER_CHARACTER_LIMIT: usize = 280;

const VERIFY_PATH: &str = "2/users/me";
const TWEETS_PATH: &str = "2/tweets";
const MAX_DETAIL_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    VerifyCredentials,
    Post,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::VerifyCredentials => write!(f, "verify credentials"),
            Operation::Post => write!(f, "post"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    data: UserData,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    username: String,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateTweet<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

/// Twitter API client
pub struct TwitterClient {
    http: reqwest::Client,
    api_base: String,
    signer: OAuth1Signer,
    account: Option<Account>,
}

impl TwitterClient {
    /// Create a client from configuration; no request is made until `authenticate`
    pub fn new(config: &TwitterConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        Self::with_signer(
            &config.api_base,
            OAuth1Signer::from_credentials(&config.credentials),
            timeouts.request(),
        )
    }

    pub fn with_signer(api_base: &str, signer: OAuth1Signer, timeout: Duration) -> Result<Self> {
        Url::parse(api_base).map_err(|e| ConfigError::InvalidValue {
            field: "twitter.api_base".to_string(),
            message: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quotebot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlatformError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            signer,
            account: None,
        })
    }

    /// The account from the last successful `authenticate`
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}/{}", self.api_base, path)).map_err(|e| {
            ConfigError::InvalidValue {
                field: "twitter.api_base".to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl Platform for TwitterClient {
    async fn authenticate(&mut self) -> Result<Account> {
        let url = self.endpoint(VERIFY_PATH)?;
        let authorization = self.signer.authorization_header("GET", &url)?;
        debug!(url = %url, "verifying Twitter credentials");

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| map_transport_error(e, Operation::VerifyCredentials))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body, Operation::VerifyCredentials).into());
        }

        let user: UserResponse = response.json().await.map_err(|e| {
            PlatformError::Authentication(format!(
                "Unexpected verify credentials response: {}",
                e
            ))
        })?;

        let account = Account {
            id: user.data.id,
            username: user.data.username,
            name: user.data.name,
        };

        info!("Authenticated as Twitter user: @{}", account.username);
        self.account = Some(account.clone());
        Ok(account)
    }

    async fn post(&self, content: &str) -> Result<String> {
        let url = self.endpoint(TWEETS_PATH)?;
        let authorization = self.signer.authorization_header("POST", &url)?;
        debug!(url = %url, chars = content.chars().count(), "posting tweet");

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, authorization)
            .json(&CreateTweet { text: content })
            .send()
            .await
            .map_err(|e| map_transport_error(e, Operation::Post))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body, Operation::Post).into());
        }

        let tweet: TweetResponse = response.json().await.map_err(|e| {
            PlatformError::Posting(format!("Unexpected post response: {}", e))
        })?;

        info!("Successfully posted tweet with ID: {}", tweet.data.id);
        Ok(tweet.data.id)
    }

    fn name(&self) -> &str {
        "twitter"
    }

    fn character_limit(&self) -> Option<usize> {
        Some(TWITTER_CHARACTER_LIMIT)
    }
}

/// Map a non-success HTTP status to PlatformError
///
/// # Error Mapping
///
/// - 429 → `PlatformError::RateLimit`
/// - 5xx → `PlatformError::Network`
/// - any other status while verifying → `PlatformError::Authentication`
/// - 401 while posting → `PlatformError::Authentication`
/// - any other status while posting → `PlatformError::Posting` (duplicate
///   content, oversized text, and similar rejections)
fn map_status_error(status: StatusCode, body: &str, operation: Operation) -> PlatformError {
    let message = format!(
        "Twitter {} failed ({}): {}",
        operation,
        status.as_u16(),
        api_error_detail(status, body)
    );

    match (status.as_u16(), operation) {
        (429, _) => PlatformError::RateLimit(message),
        (500..=599, _) => PlatformError::Network(message),
        (_, Operation::VerifyCredentials) => PlatformError::Authentication(message),
        (401, Operation::Post) => PlatformError::Authentication(message),
        (_, Operation::Post) => PlatformError::Posting(message),
    }
}

fn map_transport_error(error: reqwest::Error, operation: Operation) -> PlatformError {
    if error.is_timeout() {
        PlatformError::Network(format!("Twitter {} timed out: {}", operation, error))
    } else {
        PlatformError::Network(format!("Twitter {} request failed: {}", operation, error))
    }
}

/// Pull a readable message out of an API error body
///
/// v2 problems carry `detail`/`title`; v1.1-style bodies carry
/// `errors[].message`.
fn api_error_detail(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let from_json = parsed.as_ref().and_then(|value| {
        value
            .get("detail")
            .or_else(|| value.get("title"))
            .or_else(|| value.pointer("/errors/0/message"))
            .or_else(|| value.pointer("/errors/0/detail"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    });

    let detail = from_json.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        } else {
            trimmed.to_string()
        }
    });

    detail.chars().take(MAX_DETAIL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_verify_is_authentication() {
        let error = map_status_error(
            StatusCode::UNAUTHORIZED,
            r#"{"title":"Unauthorized","detail":"Unauthorized","status":401}"#,
            Operation::VerifyCredentials,
        );
        match error {
            PlatformError::Authentication(message) => {
                assert_eq!(message, "Twitter verify credentials failed (401): Unauthorized")
            }
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[test]
    fn test_forbidden_verify_is_authentication() {
        let error = map_status_error(StatusCode::FORBIDDEN, "", Operation::VerifyCredentials);
        assert!(matches!(error, PlatformError::Authentication(ref m) if m.contains("Forbidden")));
    }

    #[test]
    fn test_forbidden_post_is_posting_error() {
        let error = map_status_error(
            StatusCode::FORBIDDEN,
            r#"{"detail":"You are not allowed to create a Tweet with duplicate content.","status":403}"#,
            Operation::Post,
        );
        match error {
            PlatformError::Posting(message) => assert!(message.contains("duplicate content")),
            other => panic!("expected posting error, got {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_and_server_errors() {
        assert!(matches!(
            map_status_error(StatusCode::TOO_MANY_REQUESTS, "", Operation::Post),
            PlatformError::RateLimit(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::SERVICE_UNAVAILABLE, "", Operation::VerifyCredentials),
            PlatformError::Network(_)
        ));
    }

    #[test]
    fn test_api_error_detail_variants() {
        assert_eq!(
            api_error_detail(
                StatusCode::BAD_REQUEST,
                r#"{"errors":[{"message":"Text is too long"}]}"#
            ),
            "Text is too long"
        );
        assert_eq!(
            api_error_detail(StatusCode::BAD_REQUEST, r#"{"title":"Invalid Request"}"#),
            "Invalid Request"
        );
        assert_eq!(
            api_error_detail(StatusCode::BAD_GATEWAY, "  upstream down  "),
            "upstream down"
        );
        assert_eq!(api_error_detail(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(
            api_error_detail(StatusCode::BAD_REQUEST, &"x".repeat(500)).len(),
            MAX_DETAIL_LEN
        );
    }

    #[test]
    fn test_invalid_api_base_is_config_error() {
        let signer = OAuth1Signer::new("ck", "cs", "at", "ats");
        let result = TwitterClient::with_signer("not a url", signer, Duration::from_secs(1));
        assert!(matches!(
            result,
            Err(crate::error::QuotebotError::Config(
                ConfigError::InvalidValue { .. }
            ))
        ));
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let signer = OAuth1Signer::new("ck", "cs", "at", "ats");
        let client =
            TwitterClient::with_signer("http://localhost:8080/", signer, Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            client.endpoint(TWEETS_PATH).unwrap().as_str(),
            "http://localhost:8080/2/tweets"
        );
        assert!(client.account().is_none());
        assert_eq!(client.name(), "twitter");
        assert_eq!(client.character_limit(), Some(TWITTER_CHARACTER_LIMIT));
    }
}
