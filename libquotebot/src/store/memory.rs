//! In-memory quote store
//!
//! Holds a fixed list of quotes and counts calls, so tests can exercise the
//! sampling path without a database.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::store::QuoteStore;
use crate::types::Quote;

pub struct MemoryQuoteStore {
    name: String,
    quotes: Vec<Quote>,
    count_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemoryQuoteStore {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            name: "memory".to_string(),
            quotes,
            count_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn count(&self) -> Result<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.quotes.len() as u64)
    }

    async fn fetch_at(&self, offset: u64) -> Result<Option<Quote>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(usize::try_from(offset)
            .ok()
            .and_then(|index| self.quotes.get(index))
            .cloned())
    }

    fn collection(&self) -> &str {
        &self.name
    }
}
