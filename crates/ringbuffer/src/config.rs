use crate::RingBufferError;

/// Smallest accepted capacity. One slot is always held back as the sentinel,
/// so a buffer of this size stores nothing until its first growth.
pub const MIN_CAPACITY: usize = 1;

/// Capacity used by [`Config::default`].
pub const DEFAULT_CAPACITY: usize = 1024;

/// Capacity of the buffer that [`RingBuffer::clear`](crate::RingBuffer::clear)
/// installs in place of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearPolicy {
    /// Keep the capacity the buffer had grown to.
    #[default]
    RetainCapacity,
    /// Go back to the capacity the buffer was configured with.
    Initial,
}

/// Configuration for [`RingBuffer`](crate::RingBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Initial slot count, sentinel included (default: 1024)
    pub capacity: usize,
    /// Capacity to reset to on `clear`
    pub clear_policy: ClearPolicy,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(capacity: usize, clear_policy: ClearPolicy, enable_metrics: bool) -> Self {
        Self {
            capacity,
            clear_policy,
            enable_metrics,
        }
    }

    /// Sets the initial capacity.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the clear policy.
    pub const fn with_clear_policy(mut self, clear_policy: ClearPolicy) -> Self {
        self.clear_policy = clear_policy;
        self
    }

    /// Enables or disables metrics.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Checks that the configuration describes a buildable buffer.
    pub fn validate(&self) -> Result<(), RingBufferError> {
        if self.capacity < MIN_CAPACITY {
            return Err(RingBufferError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            clear_policy: ClearPolicy::RetainCapacity,
            enable_metrics: false,
        }
    }
}

/// Small configuration (16 slots), for short-lived or rarely filled queues
pub const SMALL_CONFIG: Config = Config::new(16, ClearPolicy::Initial, false);

/// Large configuration (64K slots), avoids growth for bursty producers
pub const LARGE_CONFIG: Config = Config::new(1 << 16, ClearPolicy::RetainCapacity, false);
