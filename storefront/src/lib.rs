//! Cancellable async resources and the storefront services built on them.
//!
//! The centre of this crate is [`AsyncResource`], a single-flight wrapper
//! around an asynchronous fetch operation that exposes its progress as one
//! [`State`] value and supports retry and cooperative cancellation.
//!
//! Around it sit the services of the storefront application:
//!
//! - [`catalog::Catalog`]: mock product catalogue with simulated latency
//! - [`cart::ShoppingCart`]: cart reducer with quantity and subtotal queries
//! - [`debounced_search::DebouncedSearch`]: last-call-wins debounce helper
//! - [`global_search::GlobalSearch`]: restartable shared search task with history
//!
//! # Example
//!
//! ```no_run
//! use storefront::{AsyncResource, Outcome};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let resource: AsyncResource<Vec<u32>> =
//!     AsyncResource::new(|_token| async { Outcome::<_, storefront::Error>::Value(vec![1, 2, 3]) });
//!
//! resource.load().await;
//! assert!(resource.is_success());
//! # });
//! ```

mod error;

pub mod cart;
pub mod catalog;
pub mod config;
pub mod debounced_search;
pub mod global_search;
pub mod resource;

pub use error::{Error, Result};
pub use resource::{AsyncResource, Outcome, State, Status, cancellable};

use std::sync::Arc;
use storefront_async::CancellationToken;
use trace_err::*;
use tracing::{debug, trace, warn};
