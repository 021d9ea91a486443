//! ringbuffer-rs - Growable Thread-Safe Ring Buffer
//!
//! A generic circular queue that doubles its storage instead of rejecting
//! inserts. All structural operations run under one mutex; an atomic length
//! counter lets [`RingBuffer::len`] skip the lock.
//!
//! # Key Features
//!
//! - FIFO `push` / `pop`, plus `push_front` to re-queue an item at the head
//! - Bulk `pop_n` with a single lock acquisition
//! - Vacated slots are cleared immediately, releasing popped values
//! - Lock-free, cache-padded length counter for cheap size checks
//! - Optional operation metrics and `tracing` events on growth and clear
//!
//! # Example
//!
//! ```
//! use ringbuffer_rs::{ClearPolicy, Config, RingBuffer};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let config = Config::default()
//!     .with_capacity(16)
//!     .with_clear_policy(ClearPolicy::Initial);
//! let rb = Arc::new(RingBuffer::with_config(config).unwrap());
//!
//! let producer = {
//!     let rb = Arc::clone(&rb);
//!     thread::spawn(move || {
//!         for i in 0..100u64 {
//!             rb.push(i);
//!         }
//!     })
//! };
//! producer.join().unwrap();
//!
//! // Re-queue something ahead of everything else
//! rb.push_front(u64::MAX);
//! assert_eq!(rb.pop(), Some(u64::MAX));
//!
//! let batch = rb.pop_n(10).unwrap();
//! assert_eq!(batch, (0..10).collect::<Vec<_>>());
//! assert_eq!(rb.len(), 90);
//! ```

mod buffer;
mod config;
mod error;
mod invariants;
mod metrics;
mod ring_buffer;
mod sync;

pub use config::{ClearPolicy, Config, DEFAULT_CAPACITY, LARGE_CONFIG, MIN_CAPACITY, SMALL_CONFIG};
pub use error::RingBufferError;
pub use metrics::MetricsSnapshot;
pub use ring_buffer::RingBuffer;
