//! Quotebot - post a random quote to a social timeline
//!
//! This library samples one quote from a quote store and publishes it
//! through a platform client. The `quote-post` binary runs it once per
//! invocation; scheduling is left to cron or a similar trigger.

pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod platforms;
pub mod poster;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{QuotebotError, Result};
pub use message::MessageConfig;
pub use poster::{PostOutcome, QuotePoster};
pub use store::{random_quote, QuoteStore};
pub use types::{Account, Quote};
