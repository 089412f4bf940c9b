//! Two-stage buffer that spills into an overflow buffer.

use tracing::debug;

use crate::error::{BufferError, Result};
use crate::ring_buffer::RingBuffer;

/// A primary [`RingBuffer`] chained to an overflow buffer.
///
/// Writes that do not fit the primary's free space go to a second buffer
/// (twice the primary's capacity, or the write's length if larger) instead
/// of growing the primary. Once the overflow exists every write goes there,
/// so bytes are always read back in the order they were written. When a read
/// drains the primary, the overflow takes its place.
///
/// # Example
///
/// ```
/// use giztoy_ringbuffer::LinkBuffer;
///
/// let mut buf = LinkBuffer::new(4);
/// buf.write(b"abc");
/// buf.write(b"defg"); // does not fit, spills over
/// assert_eq!(buf.capacity(), 4 + 8);
///
/// let mut out = [0u8; 7];
/// assert_eq!(buf.read(&mut out).unwrap(), 7);
/// assert_eq!(&out, b"abcdefg");
/// ```
#[derive(Debug, Default)]
pub struct LinkBuffer {
    buf: RingBuffer,
    next: Option<RingBuffer>,
}

impl LinkBuffer {
    /// Creates a buffer whose primary stage has the given capacity.
    pub fn new(capacity: usize) -> Self {
        LinkBuffer {
            buf: RingBuffer::new(capacity),
            next: None,
        }
    }

    /// Writes all of `data`. Returns `data.len()`.
    pub fn write(&mut self, data: &[u8]) -> usize {
        if data.is_empty() {
            return 0;
        }
        if self.next.is_none() && self.buf.free() >= data.len() {
            return self.buf.write(data);
        }

        let capacity = (self.buf.capacity() * 2).max(data.len());
        let next = self.next.get_or_insert_with(|| {
            debug!(capacity, "ringbuffer link: spill into overflow buffer");
            RingBuffer::new(capacity)
        });
        next.write(data)
    }

    /// Reads up to `dst.len()` bytes, draining the primary before the
    /// overflow.
    ///
    /// Fails with [`BufferError::Empty`] only when both stages are empty.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }

        let mut n = 0;
        if !self.buf.is_empty() {
            n = self.buf.read(dst)?;
        }
        if n < dst.len() {
            if let Some(next) = self.next.as_mut().filter(|b| !b.is_empty()) {
                n += next.read(&mut dst[n..])?;
            }
        }
        self.promote();

        if n == 0 {
            return Err(BufferError::Empty);
        }
        Ok(n)
    }

    /// Returns the number of readable bytes across both stages.
    pub fn len(&self) -> usize {
        self.buf.len() + self.next.as_ref().map_or(0, RingBuffer::len)
    }

    /// Returns the total storage across both stages.
    pub fn capacity(&self) -> usize {
        self.buf.capacity() + self.next.as_ref().map_or(0, RingBuffer::capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty() && self.next.as_ref().is_none_or(RingBuffer::is_empty)
    }

    /// Returns true if an overflow buffer is in use.
    pub fn is_spilled(&self) -> bool {
        self.next.is_some()
    }

    /// Empties both stages and drops the overflow buffer.
    pub fn reset(&mut self) {
        self.buf.reset();
        self.next = None;
    }

    fn promote(&mut self) {
        if !self.buf.is_empty() {
            return;
        }
        if let Some(next) = self.next.take() {
            debug!(
                capacity = next.capacity(),
                "ringbuffer link: promote overflow buffer"
            );
            self.buf = next;
        }
    }
}
