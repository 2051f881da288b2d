//! Test-synchronisation waiters.
//!
//! Code that starts asynchronous work which is not awaited by its caller
//! (a debounce timer, a fire-and-forget search) registers that work with a
//! [`Waiter`]. Tests then call [`Waiter::settled`] to block until every
//! outstanding piece of work has finished, instead of sleeping for an
//! arbitrary amount of time.
//!
//! # Example
//!
//! ```no_run
//! use storefront_async::Waiter;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let waiter = Waiter::new("catalog:refresh");
//!
//! let token = waiter.begin();
//! tokio::spawn(async move {
//!     // ... work ...
//!     drop(token);
//! });
//!
//! waiter.settled().await;
//! assert!(waiter.is_settled());
//! # });
//! ```

use alloc::sync::Arc;
use tracing::trace;

/// Tracks outstanding async operations under a descriptive name.
///
/// Cloning a `Waiter` yields a handle to the same set of operations.
#[derive(Clone)]
pub struct Waiter {
    name: Arc<str>,
    pending: Arc<tokio::sync::watch::Sender<usize>>,
}

/// Marks one outstanding async operation.
///
/// The operation ends when the token is dropped.
#[must_use = "the operation ends as soon as the token is dropped"]
pub struct WaiterToken {
    name: Arc<str>,
    pending: Arc<tokio::sync::watch::Sender<usize>>,
}

impl Waiter {
    /// Creates a waiter with no outstanding operations.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            pending: Arc::new(tokio::sync::watch::Sender::new(0)),
        }
    }

    /// The name used in trace output.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Begins an async operation. It stays outstanding until the returned
    /// token is dropped or passed to [`end()`](Waiter::end).
    pub fn begin(&self) -> WaiterToken {
        self.pending.send_modify(|n| *n += 1);
        trace!(waiter = %self.name, pending = *self.pending.borrow(), "Began async operation");
        WaiterToken {
            name: self.name.clone(),
            pending: self.pending.clone(),
        }
    }

    /// Ends an async operation.
    pub fn end(&self, token: WaiterToken) {
        drop(token)
    }

    /// Number of outstanding operations.
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Returns `true` if no operation is outstanding.
    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }

    /// Waits until no operation is outstanding.
    ///
    /// Operations begun while waiting are waited for as well.
    pub async fn settled(&self) {
        let mut rx = self.pending.subscribe();
        // The sender lives in `self`, so the channel cannot close under us
        _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl core::fmt::Debug for Waiter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Waiter")
            .field("name", &self.name)
            .field("pending", &self.pending())
            .finish()
    }
}

impl Drop for WaiterToken {
    fn drop(&mut self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
        trace!(waiter = %self.name, pending = *self.pending.borrow(), "Ended async operation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settled_with_nothing_pending() {
        let waiter = Waiter::new("idle");
        assert!(waiter.is_settled());
        waiter.settled().await;
    }

    #[tokio::test]
    async fn test_tokens_are_counted() {
        let waiter = Waiter::new("count");
        let first = waiter.begin();
        let second = waiter.clone().begin();
        assert_eq!(waiter.pending(), 2);

        waiter.end(first);
        assert_eq!(waiter.pending(), 1);

        drop(second);
        assert!(waiter.is_settled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_for_spawned_work() {
        let waiter = Waiter::new("spawned");
        let done = Arc::new(core::sync::atomic::AtomicBool::new(false));

        let token = waiter.begin();
        let flag = done.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            flag.store(true, core::sync::atomic::Ordering::SeqCst);
            drop(token);
        });

        waiter.settled().await;
        assert!(done.load(core::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_covers_chained_work() {
        let waiter = Waiter::new("chained");
        let done = Arc::new(core::sync::atomic::AtomicBool::new(false));

        let outer = waiter.begin();
        let inner_waiter = waiter.clone();
        let flag = done.clone();
        tokio::spawn(async move {
            let inner = inner_waiter.begin();
            drop(outer);
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                flag.store(true, core::sync::atomic::Ordering::SeqCst);
                drop(inner);
            });
        });

        waiter.settled().await;
        assert!(done.load(core::sync::atomic::Ordering::SeqCst));
    }
}
