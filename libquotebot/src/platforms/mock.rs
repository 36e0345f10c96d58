//! Mock platform implementation for testing
//!
//! Simulates authentication and posting outcomes without network access and
//! records every call, so tests can assert on what would have been sent.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::types::Account;

/// Configuration for mock platform behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Platform name (e.g., "mock-twitter")
    pub name: String,

    /// Whether authentication should succeed
    pub auth_succeeds: bool,

    /// Whether posting should succeed
    pub post_succeeds: bool,

    /// Error to return on authentication failure
    pub auth_error: Option<String>,

    /// Error to return on posting failure
    pub post_error: Option<String>,

    /// Account returned by a successful authentication
    pub account: Account,

    /// ID returned by a successful post
    pub post_id: String,

    /// Character limit reported by the platform
    pub character_limit: Option<usize>,

    /// Number of times authenticate has been called
    pub auth_call_count: Arc<AtomicUsize>,

    /// Number of times post has been called
    pub post_call_count: Arc<AtomicUsize>,

    /// Posts that have been made (for verification)
    pub posted_content: Arc<Mutex<Vec<String>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            auth_succeeds: true,
            post_succeeds: true,
            auth_error: None,
            post_error: None,
            account: Account {
                id: "1".to_string(),
                username: "quotebot".to_string(),
                name: Some("Quote Bot".to_string()),
            },
            post_id: "1000".to_string(),
            character_limit: Some(280),
            auth_call_count: Arc::new(AtomicUsize::new(0)),
            post_call_count: Arc::new(AtomicUsize::new(0)),
            posted_content: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock platform for testing
pub struct MockPlatform {
    config: MockConfig,
    authenticated: bool,
}

impl MockPlatform {
    /// Create a new mock platform with the given configuration
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            authenticated: false,
        }
    }

    /// Create a mock platform that always succeeds
    pub fn success(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// Create a mock platform that fails authentication
    pub fn auth_failure(name: &str, error: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            auth_succeeds: false,
            auth_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// Create a mock platform that fails posting
    pub fn post_failure(name: &str, error: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            post_succeeds: false,
            post_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Get the number of times authenticate was called
    pub fn auth_call_count(&self) -> usize {
        self.config.auth_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times post was called
    pub fn post_call_count(&self) -> usize {
        self.config.post_call_count.load(Ordering::SeqCst)
    }

    /// Get all content that was posted
    pub fn posted_content(&self) -> Vec<String> {
        self.config
            .posted_content
            .lock()
            .map(|posts| posts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn authenticate(&mut self) -> Result<Account> {
        self.config.auth_call_count.fetch_add(1, Ordering::SeqCst);

        if self.config.auth_succeeds {
            self.authenticated = true;
            Ok(self.config.account.clone())
        } else {
            let error_msg = self
                .config
                .auth_error
                .clone()
                .unwrap_or_else(|| "Mock authentication failed".to_string());
            Err(PlatformError::Authentication(error_msg).into())
        }
    }

    async fn post(&self, content: &str) -> Result<String> {
        self.config.post_call_count.fetch_add(1, Ordering::SeqCst);

        if !self.authenticated {
            return Err(PlatformError::Authentication(format!(
                "{} is not authenticated",
                self.config.name
            ))
            .into());
        }

        if !self.config.post_succeeds {
            let error_msg = self
                .config
                .post_error
                .clone()
                .unwrap_or_else(|| "Mock posting failed".to_string());
            return Err(PlatformError::Posting(error_msg).into());
        }

        if let Ok(mut posts) = self.config.posted_content.lock() {
            posts.push(content.to_string());
        }

        Ok(self.config.post_id.clone())
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn character_limit(&self) -> Option<usize> {
        self.config.character_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuotebotError;

    #[tokio::test]
    async fn test_success_records_content() {
        let mut platform = MockPlatform::success("mock-twitter");
        let account = platform.authenticate().await.unwrap();
        assert_eq!(account.username, "quotebot");

        let id = platform.post("hello").await.unwrap();
        assert_eq!(id, "1000");
        assert_eq!(platform.posted_content(), vec!["hello".to_string()]);
        assert_eq!(platform.auth_call_count(), 1);
        assert_eq!(platform.post_call_count(), 1);
    }

    #[tokio::test]
    async fn test_post_requires_authentication() {
        let platform = MockPlatform::success("mock-twitter");
        let result = platform.post("hello").await;
        assert!(matches!(
            result,
            Err(QuotebotError::Platform(PlatformError::Authentication(_)))
        ));
        assert!(platform.posted_content().is_empty());
    }

    #[tokio::test]
    async fn test_configured_failures() {
        let mut auth = MockPlatform::auth_failure("mock", "bad token");
        let err = auth.authenticate().await.unwrap_err();
        assert_eq!(err.to_string(), "Platform error: Authentication failed: bad token");
        assert!(!auth.is_authenticated());

        let mut post = MockPlatform::post_failure("mock", "too long");
        post.authenticate().await.unwrap();
        let err = post.post("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Platform error: Posting failed: too long");
    }
}
