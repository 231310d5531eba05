//! Debounced text search.
//!
//! List pages search as the user types. A search is sent only after the input
//! has been idle for the debounce delay (500 ms by default), which bounds the
//! request volume to roughly one per pause in typing.
//!
//! Every keystroke takes a new *generation*. A search whose generation has
//! been overtaken is either never sent (it was still waiting out the delay) or
//! has its response discarded (it was already in flight). Only the newest
//! search can change the displayed results, so a slow response for an old
//! query cannot overwrite a newer one.

use crate::config::CoreConfig;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Identifies one scheduled search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Results currently on display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResults<T> {
    pub query: String,
    pub ticket: SearchTicket,
    pub items: T,
}

/// What happened to one call of [`DebouncedSearch::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    /// The response was the newest and is now on display.
    Applied(T),
    /// A newer keystroke arrived during the debounce delay; nothing was sent.
    Superseded,
    /// The response arrived after a newer search was issued and was dropped.
    Stale,
}

/// Debounces searches and keeps the newest results.
#[derive(Debug)]
pub struct DebouncedSearch<T> {
    delay: Duration,
    generation: AtomicU64,
    latest: Mutex<Option<SearchResults<T>>>,
}

impl<T: Clone> DebouncedSearch<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(cfg.search_debounce())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Registers a keystroke, overtaking every earlier ticket.
    pub fn ticket(&self) -> SearchTicket {
        SearchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Waits out the debounce delay, then sends `fetch` if no newer keystroke
    /// arrived, and applies the response if it is still the newest.
    ///
    /// # Errors
    ///
    /// A failed fetch is returned only while it is still the newest search;
    /// the displayed results are left untouched. A failure for an overtaken
    /// search is reported as [`SearchOutcome::Stale`].
    pub async fn run<F, Fut, E>(
        &self,
        query: impl Into<String>,
        fetch: F,
    ) -> Result<SearchOutcome<T>, E>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let query = query.into();
        let ticket = self.ticket();

        tokio::time::sleep(self.delay).await;
        if !self.is_current(ticket) {
            return Ok(SearchOutcome::Superseded);
        }

        tracing::debug!("search {:?} sent (generation {})", query, ticket.0);
        let response = fetch(query.clone()).await;

        let mut latest = self.latest.lock().await;
        if !self.is_current(ticket) {
            tracing::debug!("search {:?} response dropped as stale", query);
            return Ok(SearchOutcome::Stale);
        }
        let items = response?;
        *latest = Some(SearchResults {
            query,
            ticket,
            items: items.clone(),
        });
        Ok(SearchOutcome::Applied(items))
    }

    /// Results currently on display, if any search has been applied.
    pub async fn latest(&self) -> Option<SearchResults<T>> {
        self.latest.lock().await.clone()
    }
}
