//! Last-call-wins debounce helper.
//!
//! Each call to [`DebouncedSearch::search`] replaces any search still waiting
//! for its timer, so a burst of keystrokes runs the callback once, with the
//! final query. Every scheduled search is registered with a [`Waiter`] so
//! tests can wait for it with [`Waiter::settled`].

use super::*;
use storefront_async::sync::spin::Mutex;
use storefront_async::time::cancellable_sleep;
use storefront_async::{TaskPool, Waiter, WaiterToken};

#[derive(Default)]
struct Timer {
    generation: u64,
    // Both present while a search is waiting for its delay to elapse
    cancel_token: Option<CancellationToken>,
    waiter_token: Option<WaiterToken>,
}

pub struct DebouncedSearch {
    delay: time::Duration,
    waiter: Waiter,
    tasks: TaskPool,
    timer: Arc<Mutex<Timer>>,
}

impl DebouncedSearch {
    /// A helper with a 300ms delay.
    pub fn new() -> Self {
        Self::with_delay(config::Config::default().search_debounce())
    }

    pub fn from_config(config: &config::Config) -> Self {
        Self::with_delay(config.search_debounce())
    }

    pub fn with_delay(delay: time::Duration) -> Self {
        Self {
            delay,
            waiter: Waiter::new("debounced-search:search"),
            tasks: TaskPool::new(),
            timer: Arc::new(Mutex::new(Timer::default())),
        }
    }

    /// Replaces the waiter that scheduled searches are registered with.
    pub fn with_waiter(mut self, waiter: Waiter) -> Self {
        self.waiter = waiter;
        self
    }

    pub fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    /// Schedules `callback(query)` after the configured delay.
    pub fn search<F, Fut>(&self, query: impl Into<String>, callback: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.search_after(query, self.delay, callback)
    }

    /// Schedules `callback(query)` after `delay`, cancelling any search that
    /// has not fired yet.
    pub fn search_after<F, Fut>(&self, query: impl Into<String>, delay: time::Duration, callback: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let query = query.into();
        let cancel_token = self.tasks.child_token();
        let waiter_token = self.waiter.begin();

        let (generation, previous, replaced) = {
            let mut timer = self.timer.lock();
            timer.generation = timer.generation.wrapping_add(1);
            (
                timer.generation,
                timer.cancel_token.replace(cancel_token.clone()),
                timer.waiter_token.replace(waiter_token),
            )
        };
        if let Some(previous) = previous {
            trace!("Replacing pending search");
            previous.cancel();
        }
        drop(replaced);

        let timer = self.timer.clone();
        storefront_async::spawn!(self.tasks, "debounced_search", async move {
            let fired = cancellable_sleep(delay, &cancel_token).await;

            // Whoever replaced or cancelled this search has already released its token
            let waiter_token = {
                let mut timer = timer.lock();
                if timer.generation == generation {
                    timer.cancel_token = None;
                    timer.waiter_token.take()
                } else {
                    None
                }
            };

            let Some(waiter_token) = waiter_token.filter(|_| fired) else {
                trace!("Pending search cancelled");
                return;
            };

            debug!(%query, "Running debounced search");
            callback(query).await;
            drop(waiter_token);
        });
    }

    /// Cancels the pending search, if its timer has not fired yet, and
    /// releases it from the waiter immediately.
    ///
    /// A callback that is already running is left to finish.
    pub fn cancel(&self) {
        let (previous, waiter_token) = {
            let mut timer = self.timer.lock();
            timer.generation = timer.generation.wrapping_add(1);
            (timer.cancel_token.take(), timer.waiter_token.take())
        };
        if let Some(previous) = previous {
            debug!("Cancelling pending search");
            previous.cancel();
        }
        drop(waiter_token);
    }

    /// `true` while a search is waiting for its delay to elapse.
    pub fn is_pending(&self) -> bool {
        self.timer.lock().cancel_token.is_some()
    }
}

impl Default for DebouncedSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;

    fn record(calls: Arc<Mutex<Vec<String>>>) -> impl FnOnce(String) -> BoxFuture<'static, ()> + Send + 'static {
        move |query| {
            Box::pin(async move {
                calls.lock().push(query);
                tokio::task::yield_now().await;
            })
        }
    }

    fn ms(millis: i64) -> time::Duration {
        time::Duration::milliseconds(millis)
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_callback_after_delay() {
        let search = DebouncedSearch::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        search.search_after("hello", ms(50), record(calls.clone()));
        assert!(calls.lock().is_empty(), "callback not called immediately");

        search.waiter().settled().await;

        assert_eq!(*calls.lock(), vec!["hello".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_search_replaces_pending() {
        let search = DebouncedSearch::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        search.search_after("first", ms(50), record(calls.clone()));
        search.search_after("second", ms(50), record(calls.clone()));
        assert_eq!(search.waiter().pending(), 1);

        search.waiter().settled().await;

        assert_eq!(*calls.lock(), vec!["second".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_pending_search() {
        let search = DebouncedSearch::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        search.search_after("query", ms(50), record(calls.clone()));
        assert!(search.is_pending());

        search.cancel();
        assert!(!search.is_pending());

        search.waiter().settled().await;
        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_settles_waiter_immediately() {
        let search = DebouncedSearch::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        search.search_after("query", ms(50), record(calls.clone()));
        assert_eq!(search.waiter().pending(), 1);

        search.cancel();
        assert_eq!(search.waiter().pending(), 0);
        assert!(search.waiter().is_settled());

        // The cancelled task must not release anything a later search holds
        search.search_after("next", ms(50), record(calls.clone()));
        tokio::task::yield_now().await;
        assert_eq!(search.waiter().pending(), 1);

        search.waiter().settled().await;
        assert_eq!(*calls.lock(), vec!["next".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_pending_reflects_timer() {
        let search = DebouncedSearch::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        assert!(!search.is_pending());

        search.search_after("query", ms(50), record(calls.clone()));
        assert!(search.is_pending());

        search.waiter().settled().await;
        assert!(!search.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_searches_run_last_only() {
        let search = DebouncedSearch::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for i in 1..=5 {
            search.search_after(format!("query{i}"), ms(50), record(calls.clone()));
        }

        search.waiter().settled().await;

        assert_eq!(*calls.lock(), vec!["query5".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_for_async_callback() {
        let search = DebouncedSearch::with_delay(ms(10));
        let completed = Arc::new(core::sync::atomic::AtomicBool::new(false));

        let flag = completed.clone();
        search.search("query", move |_| async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            flag.store(true, core::sync::atomic::Ordering::SeqCst);
        });

        search.waiter().settled().await;

        assert!(completed.load(core::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_waiter() {
        let waiter = Waiter::new("shared");
        let search = DebouncedSearch::new().with_waiter(waiter.clone());
        let calls = Arc::new(Mutex::new(Vec::new()));

        search.search("query", record(calls.clone()));
        assert_eq!(waiter.pending(), 1);

        waiter.settled().await;
        assert_eq!(calls.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_search() {
        let waiter = Waiter::new("dropped");
        let search = DebouncedSearch::new().with_waiter(waiter.clone());
        let calls = Arc::new(Mutex::new(Vec::new()));

        search.search_after("query", ms(50), record(calls.clone()));
        drop(search);

        waiter.settled().await;
        assert!(calls.lock().is_empty());
    }
}
