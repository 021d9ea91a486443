use crate::sync::{AtomicU64, Ordering};

/// Operation counters for a ring buffer.
///
/// Counters are only bumped when [`Config::enable_metrics`](crate::Config) is
/// set. They are updated while the buffer lock is held, so a snapshot taken
/// between operations is consistent with `len()`.
pub(crate) struct Metrics {
    pushed: AtomicU64,
    pushed_front: AtomicU64,
    popped: AtomicU64,
    grows: AtomicU64,
    clears: AtomicU64,
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Items appended at the back
    pub pushed: u64,
    /// Items inserted at the front
    pub pushed_front: u64,
    /// Items removed by `pop`, `pop_n` and `drain`
    pub popped: u64,
    /// Times the backing storage was replaced by a larger one
    pub grows: u64,
    /// Calls to `clear`
    pub clears: u64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self {
            pushed: AtomicU64::new(0),
            pushed_front: AtomicU64::new(0),
            popped: AtomicU64::new(0),
            grows: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn add_pushed(&self, n: u64) {
        self.pushed.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_pushed_front(&self, n: u64) {
        self.pushed_front.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_popped(&self, n: u64) {
        self.popped.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_grow(&self) {
        self.grows.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pushed: self.pushed.load(Ordering::Relaxed),
            pushed_front: self.pushed_front.load(Ordering::Relaxed),
            popped: self.popped.load(Ordering::Relaxed),
            grows: self.grows.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Metrics").field(&self.snapshot()).finish()
    }
}

impl MetricsSnapshot {
    /// Items inserted minus items removed, ignoring those dropped by `clear`.
    pub fn net_inserted(&self) -> i128 {
        i128::from(self.pushed) + i128::from(self.pushed_front) - i128::from(self.popped)
    }
}
