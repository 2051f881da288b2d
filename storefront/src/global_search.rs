//! Restartable search task shared by every consumer of the service.
//!
//! Starting a search cancels the one already running, so only the most
//! recent query can produce results. Cancelling is global too:
//! [`GlobalSearch::cancel_all`] stops the running search for everyone.

use super::*;
use crate::resource::Outcome;
use std::sync::Mutex;
use storefront_async::time::cancellable_sleep;
use storefront_async::{JoinHandle, TaskPool, async_trait};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistoryEntry {
    pub query: String,
    pub timestamp: time::OffsetDateTime,
    pub result_count: usize,
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(
        &self,
        query: &str,
        cancel_token: &CancellationToken,
    ) -> Outcome<Vec<SearchResult>, Error>;
}

/// Backend returning two canned results per query after a simulated delay.
pub struct MockSearch {
    network_delay: time::Duration,
}

impl MockSearch {
    pub fn new(network_delay: time::Duration) -> Self {
        Self { network_delay }
    }
}

#[async_trait]
impl SearchBackend for MockSearch {
    async fn search(
        &self,
        query: &str,
        cancel_token: &CancellationToken,
    ) -> Outcome<Vec<SearchResult>, Error> {
        if !cancellable_sleep(self.network_delay, cancel_token).await {
            return Outcome::Cancelled;
        }

        if query.trim().is_empty() {
            return Outcome::Value(Vec::new());
        }

        Outcome::Value(
            (1..=2)
                .map(|n| SearchResult {
                    id: n.to_string(),
                    title: format!("Global result for \"{query}\" #{n}"),
                    description: None,
                })
                .collect(),
        )
    }
}

#[derive(Default)]
struct SearchState {
    generation: u64,
    running: usize,
    current: Option<CancellationToken>,
    last_successful: Option<Arc<[SearchResult]>>,
    history: Vec<SearchHistoryEntry>,
}

// Counts a perform() as running until its task finishes or is dropped
struct Running(Arc<Mutex<SearchState>>);

impl Drop for Running {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.lock() {
            state.running = state.running.saturating_sub(1);
        }
    }
}

pub struct GlobalSearch {
    backend: Arc<dyn SearchBackend>,
    debounce: time::Duration,
    tasks: TaskPool,
    state: Arc<Mutex<SearchState>>,
}

impl GlobalSearch {
    pub fn new(backend: Arc<dyn SearchBackend>, debounce: time::Duration) -> Self {
        Self {
            backend,
            debounce,
            tasks: TaskPool::new(),
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    /// A service backed by [`MockSearch`], with delays taken from `config`.
    pub fn from_config(config: &config::Config) -> Self {
        Self::new(
            Arc::new(MockSearch::new(config.network_delay())),
            config.search_debounce(),
        )
    }

    /// Starts a search for `query`, cancelling any search still running.
    ///
    /// The handle yields the results, or `None` if the search was cancelled
    /// or superseded before it completed, or if the backend failed.
    pub fn perform(&self, query: impl Into<String>) -> JoinHandle<Option<Vec<SearchResult>>> {
        let query = query.into();
        let cancel_token = self.tasks.child_token();

        let generation = {
            let mut state = self.state.lock().trace_expect("Failed to lock search state");
            if let Some(previous) = state.current.replace(cancel_token.clone()) {
                trace!("Restarting search");
                previous.cancel();
            }
            state.generation = state.generation.wrapping_add(1);
            state.running += 1;
            state.generation
        };

        let running = Running(self.state.clone());
        let backend = self.backend.clone();
        let debounce = self.debounce;
        storefront_async::spawn!(self.tasks, "global_search", async move {
            let running = running;

            if !cancellable_sleep(debounce, &cancel_token).await {
                debug!(%query, "Search cancelled while debouncing");
                return None;
            }

            let results = match backend.search(&query, &cancel_token).await {
                Outcome::Value(results) => results,
                Outcome::Cancelled => {
                    debug!(%query, "Search cancelled");
                    return None;
                }
                Outcome::Failed(e) => {
                    warn!(%query, "Search failed: {e}");
                    return None;
                }
            };

            let mut state = running.0.lock().trace_expect("Failed to lock search state");
            if state.generation != generation {
                trace!(%query, "Discarding results of superseded search");
                return None;
            }

            state.current = None;
            state.history.push(SearchHistoryEntry {
                query: query.clone(),
                timestamp: time::OffsetDateTime::now_utc(),
                result_count: results.len(),
            });
            state.last_successful = Some(results.as_slice().into());
            debug!(%query, count = results.len(), "Search complete");

            Some(results)
        })
    }

    /// Results of the last search that completed, or nothing.
    pub fn results(&self) -> Vec<SearchResult> {
        self.state
            .lock()
            .trace_expect("Failed to lock search state")
            .last_successful
            .as_deref()
            .map(<[SearchResult]>::to_vec)
            .unwrap_or_default()
    }

    /// `true` while any search is running.
    pub fn is_searching(&self) -> bool {
        self.state
            .lock()
            .trace_expect("Failed to lock search state")
            .running
            > 0
    }

    pub fn last_query(&self) -> Option<String> {
        self.state
            .lock()
            .trace_expect("Failed to lock search state")
            .history
            .last()
            .map(|entry| entry.query.clone())
    }

    pub fn search_history(&self) -> Vec<SearchHistoryEntry> {
        self.state
            .lock()
            .trace_expect("Failed to lock search state")
            .history
            .clone()
    }

    pub fn clear_history(&self) {
        self.state
            .lock()
            .trace_expect("Failed to lock search state")
            .history
            .clear();
    }

    /// Cancels the running search, for every consumer of this service.
    ///
    /// The generation moves on as well, so a backend that ignores its token
    /// cannot publish results afterwards.
    pub fn cancel_all(&self) {
        let current = {
            let mut state = self.state.lock().trace_expect("Failed to lock search state");
            state.generation = state.generation.wrapping_add(1);
            state.current.take()
        };
        if let Some(current) = current {
            debug!("Cancelling all searches");
            current.cancel();
        }
    }

    pub async fn shutdown(&self) {
        self.tasks.shutdown().await;
    }
}
