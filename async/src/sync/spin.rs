//! Spinlock guarding the small state records of the storefront services.
//!
//! The storefront services keep their observable state behind these locks.
//! Every critical section is a handful of field assignments, so a spinlock
//! is cheaper than parking a thread. Only use these when:
//!
//! - All operations while holding the lock are O(1)
//! - Nothing blocks or performs I/O under the lock
//! - Lock is released before any `.await`
//! - Locks are never nested
//!
//! # Example
//!
//! ```
//! use storefront_async::sync::spin::Mutex;
//!
//! let generation = Mutex::new(0u64);
//! *generation.lock() += 1;
//! assert_eq!(*generation.lock(), 1);
//! ```

pub use spin::MutexGuard;

/// Mutex for state records that are swapped or bumped, never iterated.
///
/// Thin wrapper around `spin::Mutex` so callers never depend on the spin
/// crate directly.
#[derive(Debug, Default)]
pub struct Mutex<T>(spin::Mutex<T>);

impl<T> Mutex<T> {
    /// Wraps `value` in an unlocked mutex.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(spin::Mutex::new(value))
    }

    /// Spins until the lock is free, then takes it.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock()
    }

    /// Attempts to acquire the lock without spinning.
    #[inline]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.0.try_lock()
    }

    /// Unwraps the guarded value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0.into_inner()
    }
}
