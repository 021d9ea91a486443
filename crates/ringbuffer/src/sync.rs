//! Synchronization primitives, switched to loom's models under `--features loom`.
//!
//! Everything in the crate that locks or touches an atomic goes through this
//! module so `tests/loom_tests.rs` can explore the real `RingBuffer`.

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
#[cfg(feature = "loom")]
pub(crate) use loom::sync::{Mutex, MutexGuard};

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::{Mutex, MutexGuard};
