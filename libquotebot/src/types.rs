//! Core types for Quotebot

use serde::{Deserialize, Serialize};

/// A quote record as read from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Store-assigned identifier, if the store exposes one
    pub id: Option<String>,
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            author: author.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// True when either field is empty after trimming
    ///
    /// A blank quote is never handed to a platform.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() || self.author.trim().is_empty()
    }
}

/// The account a platform authenticated as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}
