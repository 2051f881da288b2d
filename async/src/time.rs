//! Timers for debouncing and simulated latency.
//!
//! Durations are expressed with the `time` crate so configuration values can
//! be negative or zero without special casing at every call site.

/// Sleeps for the specified duration.
///
/// - Positive durations: sleeps for the specified time
/// - Zero or negative durations: returns immediately without sleeping
/// - Durations exceeding `std::time::Duration::MAX`: sleeps for `MAX`
#[cfg(feature = "tokio")]
pub async fn sleep(duration: time::Duration) {
    if !duration.is_positive() {
        return;
    }

    let std_duration: std::time::Duration = duration.try_into().unwrap_or(std::time::Duration::MAX);

    tokio::time::sleep(std_duration).await;
}

/// Sleeps for the specified duration unless `cancel_token` fires first.
///
/// Returns `true` if the full duration elapsed, `false` if cancelled.
#[cfg(feature = "tokio")]
pub async fn cancellable_sleep(
    duration: time::Duration,
    cancel_token: &crate::CancellationToken,
) -> bool {
    if cancel_token.is_cancelled() {
        return false;
    }

    tokio::select! {
        () = sleep(duration) => true,
        _ = cancel_token.cancelled() => false
    }
}

/// Converts a millisecond count from configuration into a [`time::Duration`].
pub fn from_millis(millis: u64) -> time::Duration {
    time::Duration::milliseconds(i64::try_from(millis).unwrap_or(i64::MAX))
}

#[cfg(all(test, feature = "tokio"))]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_advances_clock() {
        let start = tokio::time::Instant::now();
        sleep(time::Duration::milliseconds(250)).await;
        assert!(start.elapsed() >= std::time::Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_positive_sleep_is_immediate() {
        let start = tokio::time::Instant::now();
        sleep(time::Duration::ZERO).await;
        sleep(time::Duration::seconds(-1)).await;
        assert_eq!(start.elapsed(), std::time::Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellable_sleep_completes() {
        let token = crate::CancellationToken::new();
        assert!(cancellable_sleep(time::Duration::milliseconds(50), &token).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellable_sleep_interrupted() {
        let token = crate::CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let start = tokio::time::Instant::now();
        assert!(!cancellable_sleep(time::Duration::seconds(60), &token).await);
        assert!(start.elapsed() < std::time::Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_cancellable_sleep_already_cancelled() {
        let token = crate::CancellationToken::new();
        token.cancel();
        assert!(!cancellable_sleep(time::Duration::ZERO, &token).await);
    }

    #[test]
    fn test_from_millis() {
        assert_eq!(from_millis(300), time::Duration::milliseconds(300));
        assert_eq!(from_millis(u64::MAX), time::Duration::milliseconds(i64::MAX));
    }
}
