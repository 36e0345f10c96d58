//! Status text formatting
//!
//! A status is `"{text} - {author} {hashtags}"`. By default no length limit is
//! applied and the remote API is left to reject oversized statuses; the
//! `truncate` policy shortens the quote text instead, up to the configured
//! limit or, without one, the platform's own limit.

use serde::{Deserialize, Serialize};

use crate::types::Quote;

pub const DEFAULT_HASHTAGS: [&str; 3] = ["#quotes", "#quote", "#inspiration"];

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPolicy {
    /// Send the status as formatted
    #[default]
    Passthrough,
    /// Shorten the quote text so the status fits the character limit
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub hashtags: Vec<String>,
    pub length_policy: LengthPolicy,
    /// Overrides the platform's limit under `truncate`
    pub character_limit: Option<usize>,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            hashtags: DEFAULT_HASHTAGS.iter().map(|tag| tag.to_string()).collect(),
            length_policy: LengthPolicy::default(),
            character_limit: None,
        }
    }
}

impl MessageConfig {
    /// Format a quote and apply the length policy
    ///
    /// `platform_limit` is used when no `character_limit` is configured; with
    /// neither, `truncate` behaves like `passthrough`.
    pub fn compose(&self, quote: &Quote, platform_limit: Option<usize>) -> String {
        let status = format_status(quote, &self.hashtags);

        let limit = match self.length_policy {
            LengthPolicy::Passthrough => None,
            LengthPolicy::Truncate => self.character_limit.or(platform_limit),
        };

        match limit {
            Some(limit) if status.chars().count() > limit => {
                truncate_status(quote, &self.hashtags, limit)
            }
            _ => status,
        }
    }
}

/// Concatenate quote text, author and hashtags
pub fn format_status(quote: &Quote, hashtags: &[String]) -> String {
    format!("{}{}", quote.text, attribution(&quote.author, hashtags))
}

fn attribution(author: &str, hashtags: &[String]) -> String {
    if hashtags.is_empty() {
        format!(" - {}", author)
    } else {
        format!(" - {} {}", author, hashtags.join(" "))
    }
}

fn truncate_status(quote: &Quote, hashtags: &[String], limit: usize) -> String {
    let suffix = attribution(&quote.author, hashtags);
    let suffix_len = suffix.chars().count();

    // Room for at least one character of text plus the ellipsis.
    if suffix_len + 2 > limit {
        return format_status(quote, hashtags).chars().take(limit).collect();
    }

    let budget = limit - suffix_len - 1;
    let text: String = quote.text.chars().take(budget).collect();
    format!("{}{}{}", text.trim_end(), ELLIPSIS, suffix)
}
