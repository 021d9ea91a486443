use crate::buffer::{Allocation, Buffer};
use crate::invariants::{debug_assert_bounded_count, debug_assert_sentinel_free};
use crate::sync::{AtomicUsize, Mutex, MutexGuard, Ordering};
use crate::metrics::Metrics;
use crate::{ClearPolicy, Config, MetricsSnapshot, RingBufferError, MIN_CAPACITY};
use crossbeam_utils::CachePadded;
use std::fmt;
use std::sync::PoisonError;

// =============================================================================
// LOCKING STRATEGY
// =============================================================================
//
// One mutex guards the current `Buffer` epoch: its slots, `head` and `tail`.
// `push`, `push_front`, `pop`, `pop_n`, `clear` and growth all run under it,
// so only one structural operation is in flight per ring buffer.
//
// `len` is an atomic mirror of the element count:
// - Written only while the lock is held (fetch_add / fetch_sub / swap)
// - Read under the lock to decide emptiness and fullness
// - Read without the lock by `len()` / `is_empty()` for a cheap estimate
//
// The estimate is exact at quiescent points but is not a reservation: a
// `len() > 0` followed by `pop()` can still return `None` if another thread
// got there first.
//
// Growth builds a new epoch of twice the size, moves the elements over and
// assigns it through the guard. The old epoch is unreachable afterwards.
//
// A poisoned lock is recovered. Every operation only panics before it has
// touched the buffer (allocation) or after it is consistent again, so the
// data behind a poisoned lock is still valid.
//
// =============================================================================

/// Which end of the queue an insertion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Back,
    Front,
}

/// A growable, thread-safe ring buffer.
///
/// FIFO `push`/`pop`, plus `push_front` to re-queue an item so it is popped
/// next, and `pop_n` to take a batch off the front. Capacity doubles whenever
/// an insertion would fill the last free slot; it never shrinks except through
/// [`clear`](Self::clear).
///
/// # Example
///
/// ```
/// use ringbuffer_rs::RingBuffer;
///
/// let rb = RingBuffer::new(4);
/// rb.push(1);
/// rb.push(2);
/// rb.push(3);
/// rb.push_front(0); // grows to 8 slots
///
/// assert_eq!(rb.pop(), Some(0));
/// assert_eq!(rb.pop_n(10), Some(vec![1, 2, 3]));
/// assert_eq!(rb.pop(), None);
/// ```
pub struct RingBuffer<T> {
    /// Element count, readable without the lock
    len: CachePadded<AtomicUsize>,
    /// The current storage epoch
    content: Mutex<Buffer<T>>,
    metrics: Metrics,
    config: Config,
}

impl<T> RingBuffer<T> {
    /// Creates a ring buffer with `capacity` slots.
    ///
    /// One slot is kept as a sentinel, so `capacity - 1` items fit before the
    /// first growth. A capacity of 0 is raised to [`MIN_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let config = Config::default().with_capacity(capacity.max(MIN_CAPACITY));
        Self::from_parts(config, Buffer::new(config.capacity))
    }

    /// Creates a ring buffer from a validated configuration.
    ///
    /// Fails if the capacity is below [`MIN_CAPACITY`] or the initial storage
    /// cannot be allocated.
    pub fn with_config(config: Config) -> Result<Self, RingBufferError> {
        config.validate()?;
        let buffer = Buffer::try_new(config.capacity)?;
        Ok(Self::from_parts(config, buffer))
    }

    fn from_parts(config: Config, buffer: Buffer<T>) -> Self {
        Self {
            len: CachePadded::new(AtomicUsize::new(0)),
            content: Mutex::new(buffer),
            metrics: Metrics::new(),
            config,
        }
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the number of stored items without taking the lock.
    ///
    /// Reflects the most recently completed operation. Under concurrent use it
    /// is an estimate and must not be used to predict the result of a `pop`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Returns true if [`len`](Self::len) is 0. Same caveats apply.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current slot count, sentinel included.
    pub fn capacity(&self) -> usize {
        self.lock().modulus()
    }

    /// Returns the configuration this buffer was built with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    // ---------------------------------------------------------------------
    // INSERTION
    // ---------------------------------------------------------------------

    /// Appends an item at the back.
    ///
    /// Grows the storage first if the item would take the sentinel slot.
    /// Running out of memory while growing aborts, as with `Vec::push`.
    ///
    /// # Panics
    ///
    /// Panics if the doubled slot count overflows `usize`, or if the new
    /// storage would exceed `isize::MAX` bytes (as `Vec::with_capacity` does).
    pub fn push(&self, item: T) {
        if let Err(err) = self.insert(item, End::Back, Allocation::Infallible) {
            panic!("ring buffer growth failed: {err}");
        }
    }

    /// Inserts an item at the front, so it is the next one popped.
    ///
    /// # Panics
    ///
    /// Panics if the doubled slot count overflows `usize`, or if the new
    /// storage would exceed `isize::MAX` bytes (as `Vec::with_capacity` does).
    pub fn push_front(&self, item: T) {
        if let Err(err) = self.insert(item, End::Front, Allocation::Infallible) {
            panic!("ring buffer growth failed: {err}");
        }
    }

    /// Like [`push`](Self::push), but reports allocation failure.
    ///
    /// On error the buffer is unchanged and `item` is dropped.
    pub fn try_push(&self, item: T) -> Result<(), RingBufferError> {
        self.insert(item, End::Back, Allocation::Fallible)
    }

    /// Like [`push_front`](Self::push_front), but reports allocation failure.
    ///
    /// On error the buffer is unchanged and `item` is dropped.
    pub fn try_push_front(&self, item: T) -> Result<(), RingBufferError> {
        self.insert(item, End::Front, Allocation::Fallible)
    }

    fn insert(&self, item: T, end: End, allocation: Allocation) -> Result<(), RingBufferError> {
        let mut content = self.lock();
        let len = self.len.load(Ordering::Relaxed);

        if len + 1 >= content.modulus() {
            self.grow(&mut content, len, end, allocation)?;
        }

        match end {
            End::Back => content.push_back(item),
            End::Front => content.push_front(item),
        }
        self.len.fetch_add(1, Ordering::Release);

        debug_assert_bounded_count!(len + 1, content.modulus());
        debug_assert_sentinel_free!(content);
        self.debug_check_len(&content);

        if self.config.enable_metrics {
            match end {
                End::Back => self.metrics.add_pushed(1),
                End::Front => self.metrics.add_pushed_front(1),
            }
        }

        Ok(())
    }

    /// Replaces the current epoch with one of twice the capacity.
    fn grow(
        &self,
        content: &mut MutexGuard<'_, Buffer<T>>,
        len: usize,
        end: End,
        allocation: Allocation,
    ) -> Result<(), RingBufferError> {
        let from = content.modulus();
        let next = match content.grown(allocation) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(capacity = from, len, error = %err, "ring buffer growth failed");
                return Err(err);
            }
        };

        tracing::debug!(
            from,
            to = next.modulus(),
            len,
            front = (end == End::Front),
            "ring buffer grew"
        );
        **content = next;

        if self.config.enable_metrics {
            self.metrics.add_grow();
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // REMOVAL
    // ---------------------------------------------------------------------

    /// Removes the front item. Returns `None` if the buffer is empty.
    ///
    /// The vacated slot is cleared, so the buffer keeps no reference to the
    /// returned value.
    pub fn pop(&self) -> Option<T> {
        let mut content = self.lock();
        if self.len.load(Ordering::Relaxed) == 0 {
            return None;
        }

        let item = content.take_front()?;
        self.len.fetch_sub(1, Ordering::Release);

        debug_assert_sentinel_free!(content);
        self.debug_check_len(&content);

        if self.config.enable_metrics {
            self.metrics.add_popped(1);
        }
        Some(item)
    }

    /// Removes up to `n` items from the front, in FIFO order.
    ///
    /// Returns `None` if the buffer is empty. Otherwise returns
    /// `min(n, len)` items; `pop_n(0)` on a non-empty buffer yields an empty
    /// `Vec`.
    pub fn pop_n(&self, n: usize) -> Option<Vec<T>> {
        let mut content = self.lock();
        let len = self.len.load(Ordering::Relaxed);
        if len == 0 {
            return None;
        }

        let n = n.min(len);
        self.len.fetch_sub(n, Ordering::Release);
        let items = content.take_front_n(n);

        debug_assert_eq!(items.len(), n);
        debug_assert_sentinel_free!(content);
        self.debug_check_len(&content);

        if self.config.enable_metrics {
            self.metrics.add_popped(n as u64);
        }
        Some(items)
    }

    /// Removes every item, in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        self.pop_n(usize::MAX).unwrap_or_default()
    }

    /// Returns a clone of the front item without removing it.
    pub fn peek(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock().peek_front().cloned()
    }

    // ---------------------------------------------------------------------
    // LIFECYCLE
    // ---------------------------------------------------------------------

    /// Drops every item and installs fresh, empty storage.
    ///
    /// The new capacity follows [`Config::clear_policy`]. The old items are
    /// dropped after the lock is released.
    pub fn clear(&self) {
        let mut content = self.lock();
        let capacity = match self.config.clear_policy {
            ClearPolicy::RetainCapacity => content.modulus(),
            ClearPolicy::Initial => self.config.capacity,
        };

        let old = std::mem::replace(&mut *content, Buffer::new(capacity));
        let dropped = self.len.swap(0, Ordering::Release);
        if self.config.enable_metrics {
            self.metrics.add_clear();
        }
        drop(content);

        tracing::debug!(dropped, capacity, "ring buffer cleared");
        drop(old);
    }

    // ---------------------------------------------------------------------
    // INTERNAL
    // ---------------------------------------------------------------------

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Buffer<T>> {
        self.content.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn debug_check_len(&self, content: &Buffer<T>) {
        debug_assert_eq!(
            content.len(),
            self.len.load(Ordering::Relaxed),
            "length counter out of sync with buffer indices"
        );
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        let config = Config::default();
        Self::from_parts(config, Buffer::new(config.capacity))
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for RingBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut rb = Self::default();
        rb.extend(iter);
        rb
    }
}
