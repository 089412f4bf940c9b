//! Convenience functions for creating ring buffers of common sizes.

use crate::{RingBuffer, SyncRingBuffer};

/// Creates a 256B ring buffer.
pub fn ring_bytes_256b() -> RingBuffer {
    RingBuffer::new(256)
}

/// Creates a 1KB ring buffer.
pub fn ring_bytes_1kb() -> RingBuffer {
    RingBuffer::new(1024)
}

/// Creates a 4KB ring buffer.
pub fn ring_bytes_4kb() -> RingBuffer {
    RingBuffer::new(4096)
}

/// Creates a 16KB ring buffer.
pub fn ring_bytes_16kb() -> RingBuffer {
    RingBuffer::new(16384)
}

/// Creates a 64KB ring buffer.
pub fn ring_bytes_64kb() -> RingBuffer {
    RingBuffer::new(65536)
}

/// Creates a ring buffer with the specified capacity.
pub fn ring_bytes(size: usize) -> RingBuffer {
    RingBuffer::new(size)
}

/// Creates a 4KB thread-safe ring buffer.
pub fn sync_ring_bytes_4kb() -> SyncRingBuffer {
    SyncRingBuffer::new(4096)
}

/// Creates a thread-safe ring buffer with the specified capacity.
pub fn sync_ring_bytes(size: usize) -> SyncRingBuffer {
    SyncRingBuffer::new(size)
}
