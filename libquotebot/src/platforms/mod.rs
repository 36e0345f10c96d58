//! Platform abstraction and implementations
//!
//! A platform verifies the configured credentials and publishes status text.
//! Each call is a single round trip with no internal retry.
//!
//! # Examples
//!
//! ```no_run
//! use libquotebot::platforms::{twitter::TwitterClient, Platform};
//! use libquotebot::Config;
//!
//! # async fn example() -> libquotebot::Result<()> {
//! let config = Config::load()?;
//! let mut platform = TwitterClient::new(&config.twitter, &config.timeouts)?;
//!
//! let account = platform.authenticate().await?;
//! println!("Authenticated as @{}", account.username);
//!
//! let post_id = platform.post("Stay hungry - Anon #quotes").await?;
//! println!("Posted: {}", post_id);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Account;

pub mod oauth;
pub mod twitter;

// Mock platform is available for all builds (not just tests) to support integration tests
pub mod mock;

/// Unified interface to a social platform
#[async_trait]
pub trait Platform: Send + Sync {
    /// Verify the credentials and return the account they belong to
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` if the credentials are rejected,
    /// or `PlatformError::Network` if the platform could not be reached.
    async fn authenticate(&mut self) -> Result<Account>;

    /// Publish `content` as a new public status and return its platform ID
    ///
    /// Length is not checked here; an oversized status comes back as
    /// `PlatformError::Posting` from the platform.
    async fn post(&self, content: &str) -> Result<String>;

    /// Lowercase platform identifier (e.g., "twitter")
    fn name(&self) -> &str;

    /// Maximum status length in characters, if the platform has one
    fn character_limit(&self) -> Option<usize>;
}
