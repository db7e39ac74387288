//! Debounced remote search.
//!
//! Every keystroke goes through [`SearchDebouncer::schedule`]. Only the
//! latest scheduled query reaches the catalog once input has been quiet for
//! the debounce delay. Superseded timers and in-flight requests are
//! cancelled, and a sequence number check drops any result that still
//! arrives for an older query.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::models::Movie;
use crate::tmdb::CatalogApi;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    /// Waiting for the debounce timer or the catalog.
    Pending,
    Ready,
    /// The request failed or timed out; results are empty.
    Failed(String),
    /// The catalog refused the credential. Blocking: later text issues no requests.
    Rejected(String),
}

/// What the search results area should show.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    /// Sequence number of the query this state belongs to.
    pub seq: u64,
    pub query: String,
    pub status: SearchStatus,
    pub results: Vec<Movie>,
    pub total_results: u32,
}

pub struct SearchDebouncer {
    catalog: Arc<dyn CatalogApi>,
    delay: Duration,
    request_timeout: Duration,
    state: Arc<watch::Sender<SearchState>>,
    pending: Option<CancellationToken>,
    next_seq: u64,
}

impl SearchDebouncer {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        let (tx, _rx) = watch::channel(SearchState::default());
        Self {
            catalog,
            delay: DEFAULT_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            state: Arc::new(tx),
            pending: None,
            next_seq: 0,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Records new search text. Must be called from within a Tokio runtime.
    ///
    /// Blank text cancels any pending search and clears the results at once.
    pub fn schedule(&mut self, text: &str) {
        if matches!(self.state.borrow().status, SearchStatus::Rejected(_)) {
            debug!("Catalog credential rejected, ignoring search text");
            return;
        }
        self.next_seq += 1;
        let seq = self.next_seq;
        self.cancel_pending();

        let query = text.trim().to_string();
        if query.is_empty() {
            self.state.send_replace(SearchState {
                seq,
                ..SearchState::default()
            });
            return;
        }

        // Previous results stay visible until the new ones land.
        self.state.send_modify(|s| {
            s.seq = seq;
            s.query = query.clone();
            s.status = SearchStatus::Pending;
        });

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let delay = self.delay;
        let request_timeout = self.request_timeout;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            debug!(query = %query, seq, "Issuing catalog search");
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!(seq, "Search superseded in flight");
                    return;
                }
                res = tokio::time::timeout(request_timeout, catalog.search(&query, 1)) => res,
            };

            let next = match outcome {
                Ok(Ok(page)) => SearchState {
                    seq,
                    query,
                    status: SearchStatus::Ready,
                    total_results: page.total_results,
                    results: page.results,
                },
                Ok(Err(e)) if e.is_configuration() => {
                    error!("Search for '{}' rejected: {}", query, e);
                    SearchState {
                        seq,
                        query,
                        status: SearchStatus::Rejected(e.to_string()),
                        ..SearchState::default()
                    }
                }
                Ok(Err(e)) => {
                    warn!("Search for '{}' failed: {}", query, e);
                    SearchState {
                        seq,
                        query,
                        status: SearchStatus::Failed(e.to_string()),
                        ..SearchState::default()
                    }
                }
                Err(_) => {
                    warn!("Search for '{}' timed out after {:?}", query, request_timeout);
                    SearchState {
                        seq,
                        query,
                        status: SearchStatus::Failed("request timed out".to_string()),
                        ..SearchState::default()
                    }
                }
            };

            if !apply_if_current(&state, next) {
                debug!(seq, "Dropped result for a superseded query");
            }
        });
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Publishes `next` only while it belongs to the latest scheduled query.
fn apply_if_current(state: &watch::Sender<SearchState>, next: SearchState) -> bool {
    state.send_if_modified(|current| {
        if current.seq != next.seq {
            return false;
        }
        *current = next;
        true
    })
}
