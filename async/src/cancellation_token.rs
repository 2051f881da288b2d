//! Cancellation signal handed to every fetch operation.
//!
//! A fetch operation receives a [`CancellationToken`] when it is started and is
//! expected to stop promptly once the token fires, either by polling
//! `is_cancelled()` or by racing its work against `cancelled()`.
//!
//! # Example
//!
//! ```no_run
//! use storefront_async::CancellationToken;
//!
//! async fn fetch(token: CancellationToken) -> Option<&'static str> {
//!     tokio::select! {
//!         _ = token.cancelled() => None,
//!         _ = tokio::time::sleep(std::time::Duration::from_millis(300)) => Some("data"),
//!     }
//! }
//! ```

/// A token for cooperative cancellation of async operations.
///
/// Currently uses tokio_util's CancellationToken. The useful surface is:
///
/// - `new()` - Create a new, uncancelled token
/// - `child_token()` - Create a token that is cancelled along with its parent
/// - `cancel()` - Signal cancellation
/// - `cancelled()` - Future that completes once cancelled
/// - `is_cancelled()` - Check whether cancellation has been requested
#[cfg(feature = "tokio")]
pub type CancellationToken = tokio_util::sync::CancellationToken;
