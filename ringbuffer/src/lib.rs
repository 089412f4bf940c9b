//! Growable circular byte buffers.
//!
//! This crate provides the read/write staging buffer used between byte-stream
//! producers and consumers, e.g. a network connection and its frame decoder.
//!
//! - [`RingBuffer`]: A circular byte buffer that grows instead of rejecting writes
//! - [`SyncRingBuffer`]: The same buffer behind a single lock, shareable across threads
//! - [`LinkBuffer`]: A primary buffer that spills into an overflow buffer
//! - [`BufferPool`]: Recycles buffers between short-lived owners
//!
//! # Reading and Writing
//!
//! Writes always succeed. When a write needs more room than is free, the
//! storage is reallocated and the readable bytes are moved to the front.
//! Reads copy out whatever is available and report [`BufferError::Empty`]
//! when there is nothing, which callers treat as "try again later".
//!
//! ```
//! use giztoy_ringbuffer::{BufferError, RingBuffer};
//!
//! let mut buf = RingBuffer::new(1024);
//! buf.write(b"abcd");
//! assert_eq!(buf.len(), 4);
//! assert_eq!(buf.free(), 1020);
//!
//! let mut out = [0u8; 4];
//! buf.read(&mut out).unwrap();
//! assert_eq!(&out, b"abcd");
//! assert_eq!(buf.read(&mut out), Err(BufferError::Empty));
//! ```
//!
//! # Lookahead
//!
//! [`RingBuffer::peek`] borrows up to two segments without moving the read
//! cursor, and [`RingBuffer::retrieve`] drops bytes once they are handled.
//! For decoders that need to consume bytes tentatively, the virtual read
//! methods ([`RingBuffer::virtual_read`], [`RingBuffer::virtual_flush`],
//! [`RingBuffer::virtual_revert`]) advance a shadow cursor that can be
//! committed or rolled back.
//!
//! # Thread Safety
//!
//! [`RingBuffer`] is `Send` but has no internal locking. [`SyncRingBuffer`]
//! is `Send + Sync` and can be shared between threads using `Clone` (which
//! shares the underlying buffer via `Arc`).
//!
//! # Convenience Functions
//!
//! The [`bytes`] module provides constructors for common sizes:
//!
//! ```
//! use giztoy_ringbuffer::{ring_bytes_4kb, sync_ring_bytes_4kb};
//!
//! let local = ring_bytes_4kb();
//! let shared = sync_ring_bytes_4kb();
//! ```

pub mod bytes;
mod error;
mod link_buffer;
pub mod pool;
mod ring_buffer;
mod sync_ring_buffer;
mod virtual_cursor;

pub use bytes::*;
pub use error::{BufferError, Result};
pub use link_buffer::LinkBuffer;
pub use pool::{BufferPool, PoolConfig};
pub use ring_buffer::RingBuffer;
pub use sync_ring_buffer::SyncRingBuffer;
