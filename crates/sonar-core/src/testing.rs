//! Test doubles for the suggestion engine.
//!
//! Compiled for this crate's tests and, through the `test-utils` feature, for
//! dependants that need a completion service without network access.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::suggest::SuggestionTransport;

/// A completion service with canned answers.
///
/// Unknown queries answer with an empty list. Every call is counted per query
/// so tests can assert how many requests actually went out.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Vec<String>>,
    delay: Duration,
    fail: bool,
    total: AtomicUsize,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `suggestions`.
    #[must_use]
    pub fn respond(mut self, query: &str, suggestions: &[&str]) -> Self {
        self.responses.insert(
            query.to_string(),
            suggestions.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Wait `delay` before answering each request.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail every request.
    #[must_use]
    pub const fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of requests issued for `query`.
    pub fn calls_for(&self, query: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(query)
            .copied()
            .unwrap_or(0)
    }

    /// Number of requests issued for any query.
    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl SuggestionTransport for ScriptedTransport {
    async fn fetch(&self, query: &str) -> Result<Vec<String>> {
        self.total.fetch_add(1, Ordering::SeqCst);
        {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            *calls.entry(query.to_string()).or_default() += 1;
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(Error::Transport("scripted failure".into()));
        }
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}
