//! Quote posting orchestration
//!
//! One run is strictly linear: sample a quote, authenticate the platform,
//! compose the status, post it. Every failure ends the run; nothing is retried.

use rand::Rng;
use tracing::info;

use crate::error::{QuotebotError, Result};
use crate::message::MessageConfig;
use crate::platforms::Platform;
use crate::store::{random_quote, QuoteStore};
use crate::types::{Account, Quote};

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PostOutcome {
    /// Platform name (e.g., "twitter")
    pub platform: String,
    /// Account the status was posted as
    pub account: Account,
    /// The sampled quote
    pub quote: Quote,
    /// The text that was posted
    pub status: String,
    /// Platform-specific post ID
    pub post_id: String,
}

/// Compose and post a single quote
///
/// A blank quote is rejected before the platform is called. The platform's
/// character limit applies when the message settings do not set one.
pub async fn post_quote(
    platform: &dyn Platform,
    quote: &Quote,
    message: &MessageConfig,
) -> Result<(String, String)> {
    if quote.is_blank() {
        return Err(QuotebotError::InvalidInput(
            "Quote text and author must not be empty".to_string(),
        ));
    }

    let status = message.compose(quote, platform.character_limit());
    let post_id = platform.post(&status).await?;
    Ok((status, post_id))
}

/// Runs the sample → authenticate → compose → post sequence
pub struct QuotePoster<'a> {
    store: &'a dyn QuoteStore,
    message: &'a MessageConfig,
}

impl<'a> QuotePoster<'a> {
    pub fn new(store: &'a dyn QuoteStore, message: &'a MessageConfig) -> Self {
        Self { store, message }
    }

    /// Sample a quote and compose its status without touching any platform
    ///
    /// `platform_limit` stands in for the limit of the platform that would
    /// have received the status.
    pub async fn preview<R>(
        &self,
        rng: &mut R,
        platform_limit: Option<usize>,
    ) -> Result<(Quote, String)>
    where
        R: Rng + Send + ?Sized,
    {
        let quote = random_quote(self.store, rng).await?;
        let status = self.message.compose(&quote, platform_limit);
        Ok((quote, status))
    }

    /// Sample a quote and publish it to `platform`
    pub async fn publish<R>(&self, platform: &mut dyn Platform, rng: &mut R) -> Result<PostOutcome>
    where
        R: Rng + Send + ?Sized,
    {
        let quote = random_quote(self.store, rng).await?;
        info!(
            quote_id = quote.id.as_deref().unwrap_or("-"),
            author = %quote.author,
            "Selected quote"
        );

        let account = platform.authenticate().await?;
        let (status, post_id) = post_quote(platform, &quote, self.message).await?;

        Ok(PostOutcome {
            platform: platform.name().to_string(),
            account,
            quote,
            status,
            post_id,
        })
    }
}
