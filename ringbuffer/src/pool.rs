//! Recycling pool for [`RingBuffer`] instances.
//!
//! Connection-oriented code tends to allocate one buffer per connection and
//! drop it on disconnect. A pool keeps recently released buffers around so
//! the next connection can reuse their storage.
//!
//! ```
//! use giztoy_ringbuffer::{BufferPool, PoolConfig};
//!
//! let pool = BufferPool::new(PoolConfig {
//!     initial_capacity: 256,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut buf = pool.get();
//! buf.write(b"request");
//! pool.put(buf);
//!
//! let buf = pool.get();
//! assert_eq!(buf.capacity(), 256);
//! assert!(buf.is_empty());
//! ```

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{BufferError, Result};
use crate::ring_buffer::RingBuffer;

/// Default capacity of buffers allocated by a pool.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;
/// Default number of idle buffers a pool retains.
pub const DEFAULT_MAX_IDLE: usize = 64;
/// Default capacity above which released buffers are dropped.
pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 1 << 20;

/// Pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Capacity of newly allocated buffers.
    pub initial_capacity: usize,

    /// Maximum number of idle buffers kept for reuse.
    pub max_idle: usize,

    /// Buffers that grew beyond this capacity are dropped on release
    /// instead of being kept.
    pub max_retained_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_idle: DEFAULT_MAX_IDLE,
            max_retained_capacity: DEFAULT_MAX_RETAINED_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_idle == 0 {
            return Err(BufferError::InvalidConfig(
                "max_idle must be positive".to_string(),
            ));
        }
        if self.initial_capacity > self.max_retained_capacity {
            return Err(BufferError::InvalidConfig(format!(
                "initial_capacity {} exceeds max_retained_capacity {}",
                self.initial_capacity, self.max_retained_capacity
            )));
        }
        Ok(())
    }
}

/// A thread-safe pool of reusable buffers.
///
/// Buffers are reset when returned with [`put`](Self::put), so a buffer
/// obtained from [`get`](Self::get) is always empty. Only return buffers that
/// no one else is still using.
#[derive(Debug)]
pub struct BufferPool {
    config: PoolConfig,
    idle: Mutex<Vec<RingBuffer>>,
}

impl Default for BufferPool {
    fn default() -> Self {
        BufferPool {
            config: PoolConfig::default(),
            idle: Mutex::new(Vec::new()),
        }
    }
}

impl BufferPool {
    /// Creates a pool with the given configuration.
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(BufferPool {
            idle: Mutex::new(Vec::with_capacity(config.max_idle.min(DEFAULT_MAX_IDLE))),
            config,
        })
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns an empty buffer, reusing an idle one if any.
    pub fn get(&self) -> RingBuffer {
        self.get_with_capacity(0)
    }

    /// Returns an empty buffer with at least `min_capacity` bytes of storage.
    ///
    /// Reuses the most recently released idle buffer that is large enough,
    /// otherwise allocates `max(min_capacity, initial_capacity)`.
    pub fn get_with_capacity(&self, min_capacity: usize) -> RingBuffer {
        {
            let mut idle = self.idle.lock();
            if let Some(pos) = idle.iter().rposition(|b| b.capacity() >= min_capacity) {
                let buf = idle.swap_remove(pos);
                trace!(capacity = buf.capacity(), "ringbuffer pool: reuse");
                return buf;
            }
        }

        let capacity = min_capacity.max(self.config.initial_capacity);
        trace!(capacity, "ringbuffer pool: allocate");
        RingBuffer::new(capacity)
    }

    /// Resets `buf` and keeps it for reuse.
    ///
    /// The buffer is dropped instead if it grew beyond
    /// `max_retained_capacity` or the pool already holds `max_idle` buffers.
    pub fn put(&self, mut buf: RingBuffer) {
        if buf.capacity() > self.config.max_retained_capacity {
            debug!(
                capacity = buf.capacity(),
                max = self.config.max_retained_capacity,
                "ringbuffer pool: dropping oversized buffer"
            );
            return;
        }

        buf.reset();
        let mut idle = self.idle.lock();
        if idle.len() >= self.config.max_idle {
            debug!(idle = idle.len(), "ringbuffer pool: full, dropping buffer");
            return;
        }
        idle.push(buf);
    }

    /// Returns the number of idle buffers.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    /// Drops every idle buffer.
    pub fn clear(&self) {
        self.idle.lock().clear();
    }
}

static DEFAULT_POOL: Lazy<BufferPool> = Lazy::new(BufferPool::default);

/// Returns the process-wide pool used by [`get`] and [`put`].
pub fn default_pool() -> &'static BufferPool {
    &DEFAULT_POOL
}

/// Takes a buffer from the process-wide pool.
pub fn get() -> RingBuffer {
    DEFAULT_POOL.get()
}

/// Returns a buffer to the process-wide pool.
pub fn put(buf: RingBuffer) {
    DEFAULT_POOL.put(buf)
}
