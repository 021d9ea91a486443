use crate::invariants::{debug_assert_doubled, debug_assert_live_slot};
use crate::RingBufferError;

// =============================================================================
// SLOT LAYOUT
// =============================================================================
//
// A `Buffer` is one storage epoch: a fixed array of `modulus` slots plus two
// wrapped indices.
//
//   head  - the sentinel slot immediately before the first element
//   tail  - the slot holding the last element
//
// Elements live in `head+1, head+2, ..., tail` (mod `modulus`). `head == tail`
// means empty. One slot is always left as the sentinel, so at most
// `modulus - 1` elements are stored and "full" never looks like "empty".
// Callers check `is_full()` and replace the buffer with `grown()` before
// inserting into a full one.
//
// Empty slots are `None`. Removing an element `take()`s it, so a popped value
// is released right away instead of lingering until the slot is reused.
//
// =============================================================================

/// How storage for a new epoch is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Allocation {
    /// Use the global allocator directly; out-of-memory aborts.
    Infallible,
    /// Reserve first and report out-of-memory as an error.
    Fallible,
}

/// Fixed-capacity circular storage: one epoch of a [`RingBuffer`](crate::RingBuffer).
pub(crate) struct Buffer<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
}

impl<T> Buffer<T> {
    /// Creates an empty buffer of `capacity` slots.
    pub(crate) fn new(capacity: usize) -> Self {
        Self::from_slots(Self::alloc_slots(capacity))
    }

    /// Creates an empty buffer, reporting allocation failure instead of aborting.
    pub(crate) fn try_new(capacity: usize) -> Result<Self, RingBufferError> {
        Self::try_alloc_slots(capacity).map(Self::from_slots)
    }

    fn from_slots(slots: Box<[Option<T>]>) -> Self {
        Self {
            slots,
            head: 0,
            tail: 0,
        }
    }

    fn alloc_slots(capacity: usize) -> Box<[Option<T>]> {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        slots.into_boxed_slice()
    }

    fn try_alloc_slots(capacity: usize) -> Result<Box<[Option<T>]>, RingBufferError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| RingBufferError::AllocationFailed { capacity })?;
        slots.resize_with(capacity, || None);
        Ok(slots.into_boxed_slice())
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Slot count, sentinel included.
    #[inline]
    pub(crate) fn modulus(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn head(&self) -> usize {
        self.head
    }

    /// Number of elements, derived from the indices.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        let m = self.modulus();
        (self.tail + m - self.head) % m
    }

    /// True when only the sentinel slot is free.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len() + 1 >= self.modulus()
    }

    #[inline]
    pub(crate) fn sentinel_is_free(&self) -> bool {
        self.slots[self.head].is_none()
    }

    // ---------------------------------------------------------------------
    // GROWTH
    // ---------------------------------------------------------------------

    /// Builds the next epoch: twice the slots, elements moved over in order.
    ///
    /// Element `i` (0 = front) lands in slot `i + 1` and slot 0 becomes the new
    /// sentinel, so the result has `head = 0` and `tail = len`. Both a push at
    /// the back (advance tail, write) and a push at the front (write sentinel,
    /// step head back) have room afterwards.
    ///
    /// `self` is left holding only empty slots and should be dropped. On error
    /// nothing has been moved and `self` is still intact. If doubling overflows
    /// `usize` the error carries `capacity: usize::MAX`.
    pub(crate) fn grown(&mut self, allocation: Allocation) -> Result<Self, RingBufferError> {
        let m = self.modulus();
        let capacity = m
            .checked_mul(2)
            .ok_or(RingBufferError::AllocationFailed { capacity: usize::MAX })?;

        let mut slots = match allocation {
            Allocation::Infallible => Self::alloc_slots(capacity),
            Allocation::Fallible => Self::try_alloc_slots(capacity)?,
        };
        debug_assert_doubled!(m, slots.len());

        let len = self.len();
        for (i, slot) in slots[1..=len].iter_mut().enumerate() {
            *slot = self.slots[(self.head + 1 + i) % m].take();
        }
        self.head = self.tail;

        Ok(Self {
            slots,
            head: 0,
            tail: len,
        })
    }

    // ---------------------------------------------------------------------
    // INSERTION (caller guarantees !is_full())
    // ---------------------------------------------------------------------

    /// Appends behind the last element.
    #[inline]
    pub(crate) fn push_back(&mut self, item: T) {
        debug_assert!(!self.is_full());
        self.tail = (self.tail + 1) % self.modulus();
        self.slots[self.tail] = Some(item);
    }

    /// Writes into the sentinel slot and moves the sentinel one step back.
    #[inline]
    pub(crate) fn push_front(&mut self, item: T) {
        debug_assert!(!self.is_full());
        let m = self.modulus();
        self.slots[self.head] = Some(item);
        self.head = (self.head + m - 1) % m;
    }

    // ---------------------------------------------------------------------
    // REMOVAL
    // ---------------------------------------------------------------------

    /// Removes the front element, leaving its slot empty.
    pub(crate) fn take_front(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None;
        }
        self.head = (self.head + 1) % self.modulus();
        let item = self.slots[self.head].take();
        debug_assert_live_slot!(item, self.head);
        item
    }

    /// Removes up to `n` elements from the front, in order.
    pub(crate) fn take_front_n(&mut self, n: usize) -> Vec<T> {
        let m = self.modulus();
        let n = n.min(self.len());

        let mut items = Vec::with_capacity(n);
        for i in 1..=n {
            let idx = (self.head + i) % m;
            let slot = self.slots[idx].take();
            debug_assert_live_slot!(slot, idx);
            items.extend(slot);
        }
        self.head = (self.head + n) % m;

        items
    }

    /// Borrows the front element.
    #[inline]
    pub(crate) fn peek_front(&self) -> Option<&T> {
        if self.head == self.tail {
            return None;
        }
        self.slots[(self.head + 1) % self.modulus()].as_ref()
    }
}
