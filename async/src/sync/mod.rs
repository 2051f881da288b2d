//! Synchronization primitives with platform-appropriate implementations.
//!
//! # Submodules
//!
//! - [`spin`] - Spinlock-based primitives for O(1) state updates
//!
//! # Choosing the Right Primitive
//!
//! | Use Case | Primitive |
//! |----------|-----------|
//! | O(1) state swap, never held across `.await` | [`spin::Mutex`] |
//! | O(n) iteration, may block | `std::sync::Mutex` |

pub mod spin;
