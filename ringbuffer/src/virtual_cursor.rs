//! Speculative reads on top of [`RingBuffer`].
//!
//! A virtual read copies bytes out like [`RingBuffer::read`] but advances a
//! shadow cursor instead of the committed one. The consumer then either
//! commits the bytes with [`virtual_flush`](RingBuffer::virtual_flush) or
//! gives them back with [`virtual_revert`](RingBuffer::virtual_revert).
//!
//! This suits frame decoders: read a header speculatively, and if the body
//! has not fully arrived yet, revert and wait for more writes.
//!
//! ```
//! use giztoy_ringbuffer::RingBuffer;
//!
//! let mut buf = RingBuffer::new(16);
//! buf.write(&[3, b'a', b'b']); // length-prefixed frame, one byte short
//!
//! let mut len = [0u8; 1];
//! buf.virtual_read(&mut len).unwrap();
//! if buf.len() - buf.virtual_len() < len[0] as usize {
//!     buf.virtual_revert();
//! }
//! assert_eq!(buf.len(), 3);
//!
//! buf.write(b"c");
//! buf.virtual_read(&mut len).unwrap();
//! let mut body = vec![0u8; len[0] as usize];
//! buf.virtual_read(&mut body).unwrap();
//! buf.virtual_flush();
//! assert_eq!(body, b"abc");
//! assert!(buf.is_empty());
//! ```
//!
//! Committed consumption ([`read`](RingBuffer::read),
//! [`read_byte`](RingBuffer::read_byte), [`retrieve`](RingBuffer::retrieve),
//! [`retrieve_all`](RingBuffer::retrieve_all), [`reset`](RingBuffer::reset))
//! discards any pending virtual read. Writes, including ones that grow the
//! storage, leave it intact.

use crate::error::{BufferError, Result};
use crate::ring_buffer::RingBuffer;

impl RingBuffer {
    /// Reads up to `dst.len()` bytes past the virtual cursor.
    ///
    /// The committed read position, [`len`](Self::len) and the stored bytes
    /// are unchanged. Fails with [`BufferError::Empty`] when every readable
    /// byte has already been read virtually.
    pub fn virtual_read(&mut self, dst: &mut [u8]) -> Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }

        let available = self.len() - self.virtual_len;
        if available == 0 {
            return Err(BufferError::Empty);
        }

        let n = dst.len().min(available);
        self.copy_out(self.virtual_read_pos(), &mut dst[..n]);
        self.virtual_len += n;
        Ok(n)
    }

    /// Returns the number of bytes read virtually but not yet committed.
    pub fn virtual_len(&self) -> usize {
        self.virtual_len
    }

    /// Commits the pending virtual read, dropping those bytes.
    pub fn virtual_flush(&mut self) {
        let n = self.virtual_len;
        self.retrieve(n);
        self.virtual_len = 0;
    }

    /// Discards the pending virtual read, making those bytes readable again.
    pub fn virtual_revert(&mut self) {
        self.virtual_len = 0;
    }

    fn virtual_read_pos(&self) -> usize {
        // Only called with bytes available, so capacity > 0.
        (self.read_pos() + self.virtual_len) % self.capacity()
    }
}
