//! Error types for ring buffer construction and growth.

use thiserror::Error;

/// Errors that can occur when building or growing a [`RingBuffer`](crate::RingBuffer).
///
/// An empty buffer is not an error: `pop` and `pop_n` report it with `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingBufferError {
    /// The configured capacity cannot hold a single slot.
    #[error("invalid capacity {capacity} (minimum: {})", crate::MIN_CAPACITY)]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// Backing storage for the requested slot count could not be allocated.
    ///
    /// `capacity` is `usize::MAX` when doubling the current slot count
    /// would overflow.
    #[error("failed to allocate ring buffer storage for {capacity} slots")]
    AllocationFailed {
        /// The slot count that was requested.
        capacity: usize,
    },
}

impl RingBufferError {
    /// Returns `true` if the error was caused by memory exhaustion rather than
    /// by a bad argument.
    #[inline]
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}
