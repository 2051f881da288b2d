use super::*;

/// How a fetch operation settled.
///
/// Cancellation is its own variant rather than a special kind of error, so
/// [`AsyncResource`] can route it without inspecting the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Value(T),
    Cancelled,
    Failed(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Value(v) => Outcome::Value(f(v)),
            Outcome::Cancelled => Outcome::Cancelled,
            Outcome::Failed(e) => Outcome::Failed(e),
        }
    }

    /// Converts into a `Result`, with `None` standing for cancellation.
    pub fn into_result(self) -> Option<core::result::Result<T, E>> {
        match self {
            Outcome::Value(v) => Some(Ok(v)),
            Outcome::Cancelled => None,
            Outcome::Failed(e) => Some(Err(e)),
        }
    }
}

impl<T, E> From<core::result::Result<T, E>> for Outcome<T, E> {
    fn from(r: core::result::Result<T, E>) -> Self {
        match r {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Failed(e),
        }
    }
}

/// Races `work` against `cancel_token`.
///
/// Yields [`Outcome::Cancelled`] if the token fires first (or has already
/// fired), otherwise whatever `work` settles with. Fetch operations that do
/// not poll the token themselves can wrap their body in this.
pub async fn cancellable<T, E, F>(cancel_token: &CancellationToken, work: F) -> Outcome<T, E>
where
    F: Future,
    F::Output: Into<Outcome<T, E>>,
{
    if cancel_token.is_cancelled() {
        return Outcome::Cancelled;
    }

    tokio::select! {
        biased;
        _ = cancel_token.cancelled() => Outcome::Cancelled,
        r = work => r.into(),
    }
}
