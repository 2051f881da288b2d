//! Task handle returned when a service spawns background work.
//!
//! # Example
//!
//! ```no_run
//! use storefront_async::{JoinHandle, TaskPool};
//!
//! async fn example() {
//!     let pool = TaskPool::new();
//!     let handle: JoinHandle<usize> = pool.spawn(async { 2 });
//!     assert_eq!(handle.await.unwrap(), 2);
//! }
//! ```

/// A handle to a spawned task that can be awaited for its result.
///
/// Awaiting yields `Err` only if the task panicked or was aborted.
#[cfg(feature = "tokio")]
pub type JoinHandle<T> = tokio::task::JoinHandle<T>;
