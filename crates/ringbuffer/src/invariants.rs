//! Debug assertion macros for ring buffer invariants.
//!
//! They are only active in debug builds (`#[cfg(debug_assertions)]`), so there is
//! zero overhead in release builds.
//!
//! Used by both `Buffer<T>` and `RingBuffer<T>`.

// =============================================================================
// Bounded count
// =============================================================================

/// Assert that the stored count leaves the sentinel slot free.
///
/// **Invariant**: `len ≤ modulus - 1`
///
/// Used in: `push()` / `push_front()` after the insertion
macro_rules! debug_assert_bounded_count {
    ($len:expr, $modulus:expr) => {
        debug_assert!(
            $len < $modulus,
            "bounded count violated: {} items in {} slots leaves no sentinel",
            $len,
            $modulus
        )
    };
}

// =============================================================================
// Sentinel slot
// =============================================================================

/// Assert that the slot at `head` carries no value.
///
/// **Invariant**: `slots[head].is_none()` between operations
///
/// Used in: every structural operation before the lock is released
macro_rules! debug_assert_sentinel_free {
    ($buffer:expr) => {
        debug_assert!(
            $buffer.sentinel_is_free(),
            "sentinel violated: slot {} before the front element holds a value",
            $buffer.head()
        )
    };
}

// =============================================================================
// Growth
// =============================================================================

/// Assert that a replacement buffer is exactly twice the size of the old one.
///
/// **Invariant**: `new_modulus == old_modulus * 2`
///
/// Used in: `Buffer::grown()`
macro_rules! debug_assert_doubled {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new == $old * 2,
            "growth violated: capacity went from {} to {} instead of doubling",
            $old,
            $new
        )
    };
}

// =============================================================================
// Live slot read
// =============================================================================

/// Assert that a slot taken as live actually held an element.
///
/// **Invariant**: slots `head+1 ..= tail` are `Some`
///
/// Used in: `Buffer::take_front()` / `Buffer::take_front_n()`
macro_rules! debug_assert_live_slot {
    ($slot:expr, $idx:expr) => {
        debug_assert!(
            $slot.is_some(),
            "live slot violated: slot {} inside the valid range was empty",
            $idx
        )
    };
}

// =============================================================================
// Re-exports for crate-internal use
// =============================================================================

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_doubled;
pub(crate) use debug_assert_live_slot;
pub(crate) use debug_assert_sentinel_free;
