//! Owner for the background tasks a service spawns.
//!
//! Services such as the global search or the debounced search helper spawn
//! short-lived tasks that must all be cancelled when the service is torn
//! down. [`TaskPool`] groups those tasks under one cancellation token and
//! tracks them so teardown can wait for them to finish.
//!
//! # Shutdown
//!
//! 1. **Signal**: Cancel all tasks via the cancellation token
//! 2. **Close**: Stop accepting new tasks
//! 3. **Wait**: Return once every tracked task has completed
//!
//! # Example
//!
//! ```no_run
//! use storefront_async::TaskPool;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let pool = TaskPool::new();
//! let cancel = pool.child_token();
//!
//! pool.spawn(async move {
//!     tokio::select! {
//!         _ = refresh_catalog() => {}
//!         _ = cancel.cancelled() => {}
//!     }
//! });
//!
//! pool.shutdown().await;
//! # });
//! # async fn refresh_catalog() {}
//! ```

use crate::cancellation_token::CancellationToken;
use crate::join_handle::JoinHandle;

/// Manages a group of cancellable tasks with graceful shutdown.
///
/// Combines a [`CancellationToken`] with a [`tokio_util::task::TaskTracker`].
/// Individual operations should run under a [`child_token()`](TaskPool::child_token)
/// so they can be cancelled alone, while [`shutdown()`](TaskPool::shutdown)
/// cancels everything at once.
pub struct TaskPool {
    cancel_token: CancellationToken,
    task_tracker: tokio_util::task::TaskTracker,
}

impl TaskPool {
    /// Creates a new task pool.
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_tracker: tokio_util::task::TaskTracker::new(),
        }
    }

    /// Returns the pool-wide cancellation token.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Creates a token that is cancelled with the pool, but can also be
    /// cancelled on its own without affecting the pool or its siblings.
    pub fn child_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Spawns a task tracked by this pool.
    ///
    /// Tasks spawned after [`shutdown()`](TaskPool::shutdown) still run, but
    /// are not waited for.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: core::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.task_tracker.spawn(task)
    }

    /// Number of tracked tasks that have not yet completed.
    pub fn len(&self) -> usize {
        self.task_tracker.len()
    }

    /// Returns `true` if no tracked task is running.
    pub fn is_empty(&self) -> bool {
        self.task_tracker.is_empty()
    }

    /// Cancels every task, stops tracking new ones and waits for the
    /// tracked tasks to complete.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        self.task_tracker.close();
        self.task_tracker.wait().await;
    }

    /// Returns `true` once [`shutdown()`](TaskPool::shutdown) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
