//! Single-flight wrapper around an asynchronous fetch operation.
//!
//! An [`AsyncResource`] owns a fetch operation and at most one in-flight
//! invocation of it. Its progress is always exactly one [`State`]:
//!
//! ```text
//!          load()/retry()               Value(v)
//!   Idle ─────────────────► Loading ──────────────► Success(v)
//!    ▲                        │  │      Failed(e)
//!    │        Cancelled       │  └────────────────► Error(e)
//!    └────────────────────────┘
//! ```
//!
//! `load()` may be called from any state. Each call bumps a generation
//! counter, cancels the previous call's token and hands a fresh token to the
//! fetch operation. When a call settles its outcome is applied only if its
//! generation is still current, so a superseded operation can never
//! overwrite the state set by a newer one, whether or not it honoured its
//! cancellation token.

mod outcome;
mod shape;

pub use outcome::{Outcome, cancellable};
pub use shape::ResultShape;

use super::*;
use futures::FutureExt;
use futures::future::BoxFuture;
use storefront_async::sync::spin::Mutex;

/// Observable state of an [`AsyncResource`].
#[derive(Debug)]
pub enum State<T, E> {
    Idle,
    Loading,
    Success(Arc<T>),
    Error(Arc<E>),
}

/// The discriminant of a [`State`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

impl<T, E> State<T, E> {
    pub fn status(&self) -> Status {
        match self {
            State::Idle => Status::Idle,
            State::Loading => Status::Loading,
            State::Success(_) => Status::Success,
            State::Error(_) => Status::Error,
        }
    }

    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            State::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Arc<E>> {
        match self {
            State::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl<T, E> Clone for State<T, E> {
    fn clone(&self) -> Self {
        match self {
            State::Idle => State::Idle,
            State::Loading => State::Loading,
            State::Success(data) => State::Success(data.clone()),
            State::Error(error) => State::Error(error.clone()),
        }
    }
}

impl<T, E> Default for State<T, E> {
    fn default() -> Self {
        State::Idle
    }
}

type FetchFn<T, E> = dyn Fn(CancellationToken) -> BoxFuture<'static, Outcome<T, E>> + Send + Sync;

struct Inner<T, E> {
    state: State<T, E>,
    generation: u64,
    // Present iff state is Loading
    cancel_token: Option<CancellationToken>,
}

/// Wraps one asynchronous fetch operation with load, retry, cancel and reset.
///
/// The fetch operation receives a [`CancellationToken`] and may return
/// anything convertible into an [`Outcome`], including a plain `Result`.
/// Failures are never returned from [`load()`](AsyncResource::load); they
/// are stored and read back through [`state()`](AsyncResource::state) or
/// [`error()`](AsyncResource::error). Cancellation is never an error: a
/// cancelled load returns the resource to [`State::Idle`].
///
/// Dropping the resource cancels any pending operation.
pub struct AsyncResource<T, E = Error> {
    fetch: Box<FetchFn<T, E>>,
    inner: Arc<Mutex<Inner<T, E>>>,
}

impl<T, E> AsyncResource<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    pub fn new<F, Fut, O>(fetch: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        O: Into<Outcome<T, E>>,
    {
        Self {
            fetch: Box::new(move |cancel_token| {
                let fut = fetch(cancel_token);
                async move { fut.await.into() }.boxed()
            }),
            inner: Arc::new(Mutex::new(Inner {
                state: State::Idle,
                generation: 0,
                cancel_token: None,
            })),
        }
    }

    /// Starts the fetch operation, superseding any load still in flight.
    ///
    /// The transition to [`State::Loading`] and the invocation of the fetch
    /// operation happen immediately, before the returned future is polled.
    /// Awaiting the future drives the operation to settlement and applies
    /// its outcome. Dropping the future before it settles cancels the
    /// operation and, if it is still the current one, returns the resource
    /// to [`State::Idle`].
    pub fn load(&self) -> impl Future<Output = ()> + Send + use<T, E> {
        let cancel_token = CancellationToken::new();
        let (generation, previous) = {
            let mut inner = self.inner.lock();
            inner.generation = inner.generation.wrapping_add(1);
            inner.state = State::Loading;
            (inner.generation, inner.cancel_token.replace(cancel_token.clone()))
        };

        if let Some(previous) = previous {
            trace!(generation, "Superseding in-flight load");
            previous.cancel();
        }

        debug!(generation, "Loading resource");
        let fetch = (self.fetch)(cancel_token.clone());
        let mut settlement = Settlement {
            inner: self.inner.clone(),
            generation,
            cancel_token,
            settled: false,
        };

        async move {
            let outcome = fetch.await;
            settlement.apply(outcome);
        }
    }

    /// Loads again. Identical to [`load()`](AsyncResource::load).
    pub fn retry(&self) -> impl Future<Output = ()> + Send + use<T, E> {
        self.load()
    }

    /// Signals the in-flight operation, if any, to abort.
    ///
    /// The state does not change here: it returns to [`State::Idle`] once the
    /// fetch operation observes the signal and settles with
    /// [`Outcome::Cancelled`]. A no-op when nothing is in flight.
    pub fn cancel(&self) {
        let cancel_token = self.inner.lock().cancel_token.clone();
        if let Some(cancel_token) = cancel_token {
            debug!("Cancelling in-flight load");
            cancel_token.cancel();
        }
    }

    /// Returns to [`State::Idle`] from any state, cancelling and disowning
    /// any in-flight operation.
    pub fn reset(&self) {
        let previous = {
            let mut inner = self.inner.lock();
            inner.generation = inner.generation.wrapping_add(1);
            inner.state = State::Idle;
            inner.cancel_token.take()
        };

        if let Some(previous) = previous {
            previous.cancel();
        }
        trace!("Resource reset");
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> State<T, E> {
        self.inner.lock().state.clone()
    }

    pub fn status(&self) -> Status {
        self.inner.lock().state.status()
    }

    pub fn is_idle(&self) -> bool {
        self.status() == Status::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status() == Status::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status() == Status::Success
    }

    pub fn is_error(&self) -> bool {
        self.status() == Status::Error
    }

    /// The loaded value, present only in [`State::Success`].
    pub fn data(&self) -> Option<Arc<T>> {
        self.inner.lock().state.data().cloned()
    }

    /// The failure, present only in [`State::Error`].
    pub fn error(&self) -> Option<Arc<E>> {
        self.inner.lock().state.error().cloned()
    }

    /// `true` iff the loaded value is a sequence with no elements.
    pub fn is_empty_result(&self) -> bool
    where
        T: ResultShape,
    {
        self.inner
            .lock()
            .state
            .data()
            .is_some_and(|data| data.is_empty_sequence())
    }
}

impl<T, E> Drop for AsyncResource<T, E> {
    fn drop(&mut self) {
        let cancel_token = self.inner.lock().cancel_token.take();
        if let Some(cancel_token) = cancel_token {
            cancel_token.cancel();
        }
    }
}

impl<T, E> core::fmt::Debug for AsyncResource<T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("AsyncResource")
            .field("status", &inner.state.status())
            .field("generation", &inner.generation)
            .finish()
    }
}

// Applies the outcome of one load() call, or reverts it if dropped unsettled
struct Settlement<T, E> {
    inner: Arc<Mutex<Inner<T, E>>>,
    generation: u64,
    cancel_token: CancellationToken,
    settled: bool,
}

impl<T, E> Settlement<T, E> {
    fn apply(&mut self, outcome: Outcome<T, E>) {
        self.settled = true;

        let status = {
            let mut inner = self.inner.lock();
            if inner.generation != self.generation {
                None
            } else {
                inner.cancel_token = None;
                inner.state = match outcome {
                    Outcome::Value(data) => State::Success(Arc::new(data)),
                    Outcome::Cancelled => State::Idle,
                    Outcome::Failed(error) => State::Error(Arc::new(error)),
                };
                Some(inner.state.status())
            }
        };

        match status {
            None => trace!(generation = self.generation, "Discarding result of superseded load"),
            Some(Status::Success) => debug!(generation = self.generation, "Resource loaded"),
            Some(Status::Error) => warn!(generation = self.generation, "Resource load failed"),
            Some(_) => debug!(generation = self.generation, "Resource load cancelled"),
        }
    }
}

impl<T, E> Drop for Settlement<T, E> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        self.cancel_token.cancel();
        let mut inner = self.inner.lock();
        if inner.generation == self.generation {
            inner.cancel_token = None;
            inner.state = State::Idle;
        }
    }
}
