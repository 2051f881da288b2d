//! Runtime-agnostic async primitives for the storefront utilities.
//!
//! This crate wraps the async runtime primitives the storefront services
//! depend on, so that resources, debouncers and search tasks never name a
//! runtime directly. Tokio is the only runtime currently supported.
//!
//! # Features
//!
//! - **TaskPool**: Owns cancellable background tasks with graceful shutdown
//! - **Waiter**: Tracks outstanding async work so tests can wait for it to settle
//! - **CancellationToken**: Cooperative cancellation signal handed to fetch operations
//! - **JoinHandle**: Abstracted task handle type for runtime portability
//!
//! # Example
//!
//! ```no_run
//! use storefront_async::Waiter;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let waiter = Waiter::new("example");
//! let token = waiter.begin();
//!
//! tokio::spawn(async move {
//!     do_work().await;
//!     drop(token);
//! });
//!
//! waiter.settled().await;
//! # });
//! # async fn do_work() {}
//! ```

extern crate alloc;

mod spawn;

pub mod cancellation_token;
pub mod join_handle;
pub mod sync;
pub mod task_pool;
pub mod time;
pub mod waiter;

// Re-export commonly used types at crate root
pub use async_trait::async_trait;
pub use cancellation_token::CancellationToken;
pub use join_handle::JoinHandle;
pub use task_pool::TaskPool;
pub use waiter::{Waiter, WaiterToken};
