//! Growable circular byte buffer.

use std::fmt;
use std::io;

use tracing::trace;

use crate::error::{BufferError, Result};

/// A growable circular byte buffer.
///
/// `RingBuffer` stores bytes in a fixed-size circular array addressed by a
/// read cursor and a write cursor. When a write needs more room than is free,
/// the storage is reallocated in place: existing bytes are linearized to the
/// start of a larger array and the write proceeds. Writes therefore never
/// fail and never block.
///
/// `RingBuffer` has no internal synchronization. Wrap it in a
/// [`SyncRingBuffer`](crate::SyncRingBuffer) to share it between threads.
///
/// # Semantics
///
/// - **Write**: Always writes the full input, growing the storage if needed
/// - **Read**: Copies out what is available, `Empty` if nothing is
/// - **Peek**: Up to two borrowed segments, cursors untouched
/// - **Retrieve**: Drops bytes without copying them out
///
/// # Example
///
/// ```
/// use giztoy_ringbuffer::RingBuffer;
///
/// let mut buf = RingBuffer::new(4);
/// buf.write(b"abcdef"); // grows to 6
/// assert_eq!(buf.capacity(), 6);
///
/// let (head, tail) = buf.peek(4);
/// assert_eq!(head, b"abcd");
/// assert!(tail.is_empty());
///
/// let mut out = [0u8; 6];
/// assert_eq!(buf.read(&mut out).unwrap(), 6);
/// assert_eq!(&out, b"abcdef");
/// ```
pub struct RingBuffer {
    buf: Vec<u8>,
    r: usize, // next position to read
    w: usize, // next position to write
    // Disambiguates r == w: empty when set, full otherwise.
    is_empty: bool,
    // Bytes consumed by virtual reads but not yet committed. The virtual
    // cursor sits at (r + virtual_len) % capacity.
    pub(crate) virtual_len: usize,
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<Vec<u8>> for RingBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl RingBuffer {
    /// Creates an empty buffer with the given capacity.
    ///
    /// A capacity of zero is allowed; the first write grows the storage.
    pub fn new(capacity: usize) -> Self {
        RingBuffer {
            buf: vec![0; capacity],
            r: 0,
            w: 0,
            is_empty: true,
            virtual_len: 0,
        }
    }

    /// Creates a buffer that takes ownership of `data` without copying it.
    ///
    /// The vec's length becomes the capacity and every byte is readable, so
    /// the buffer starts full (or empty, for an empty vec).
    pub fn from_vec(data: Vec<u8>) -> Self {
        let is_empty = data.is_empty();
        RingBuffer {
            buf: data,
            r: 0,
            w: 0,
            is_empty,
            virtual_len: 0,
        }
    }

    /// Returns the number of readable bytes.
    pub fn len(&self) -> usize {
        if self.w == self.r {
            if self.is_empty {
                return 0;
            }
            return self.buf.len();
        }
        if self.w > self.r {
            return self.w - self.r;
        }
        self.buf.len() - self.r + self.w
    }

    /// Returns the size of the underlying storage.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of bytes that can be written without growing.
    pub fn free(&self) -> usize {
        self.buf.len() - self.len()
    }

    /// Returns true if there is nothing to read.
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Returns true if the storage holds no free bytes.
    pub fn is_full(&self) -> bool {
        !self.is_empty && self.r == self.w
    }

    /// Writes all of `data`, growing the storage first if it does not fit.
    ///
    /// Returns `data.len()`.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = data.len();
        if n == 0 {
            return 0;
        }

        let free = self.free();
        if free < n {
            self.grow(n - free);
        }

        let capacity = self.buf.len();
        let tail = capacity - self.w;
        if n <= tail {
            self.buf[self.w..self.w + n].copy_from_slice(data);
        } else {
            // Split: [w, capacity) then [0, n - tail)
            self.buf[self.w..].copy_from_slice(&data[..tail]);
            self.buf[..n - tail].copy_from_slice(&data[tail..]);
        }

        self.w = (self.w + n) % capacity;
        self.is_empty = false;
        n
    }

    /// Writes the UTF-8 bytes of `s`.
    pub fn write_str(&mut self, s: &str) -> usize {
        self.write(s.as_bytes())
    }

    /// Writes a single byte, growing the storage by one if it is full.
    pub fn write_byte(&mut self, b: u8) {
        if self.free() < 1 {
            self.grow(1);
        }

        self.buf[self.w] = b;
        self.w += 1;
        if self.w == self.buf.len() {
            self.w = 0;
        }
        self.is_empty = false;
    }

    /// Reads up to `dst.len()` bytes into `dst`.
    ///
    /// Returns the number of bytes read. Reading into an empty slice is a
    /// no-op returning `Ok(0)`; otherwise an empty buffer yields
    /// [`BufferError::Empty`]. Discards any pending virtual read.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }
        if self.is_empty {
            return Err(BufferError::Empty);
        }

        let n = dst.len().min(self.len());
        self.copy_out(self.r, &mut dst[..n]);
        self.advance_read(n);
        Ok(n)
    }

    /// Reads the next byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        if self.is_empty {
            return Err(BufferError::Empty);
        }

        let b = self.buf[self.r];
        self.advance_read(1);
        Ok(b)
    }

    /// Returns up to `n` readable bytes without consuming them.
    ///
    /// The bytes come back as two segments because the readable window may
    /// wrap past the end of the storage: the first segment runs up to the
    /// physical end, the second (possibly empty) restarts at offset zero.
    pub fn peek(&self, n: usize) -> (&[u8], &[u8]) {
        self.segments(self.r, n.min(self.len()))
    }

    /// Returns every readable byte without consuming it. See [`peek`](Self::peek).
    pub fn peek_all(&self) -> (&[u8], &[u8]) {
        self.segments(self.r, self.len())
    }

    /// Drops `n` readable bytes without copying them out.
    ///
    /// Clears the buffer if `n` covers everything readable.
    pub fn retrieve(&mut self, n: usize) {
        if self.is_empty || n == 0 {
            return;
        }

        if n < self.len() {
            self.advance_read(n);
        } else {
            self.retrieve_all();
        }
    }

    /// Drops every readable byte and rewinds both cursors to zero.
    pub fn retrieve_all(&mut self) {
        self.r = 0;
        self.w = 0;
        self.is_empty = true;
        self.virtual_len = 0;
    }

    /// Returns a linear copy of the readable bytes.
    pub fn bytes(&self) -> Vec<u8> {
        let (head, tail) = self.peek_all();
        let mut out = Vec::with_capacity(head.len() + tail.len());
        out.extend_from_slice(head);
        out.extend_from_slice(tail);
        out
    }

    /// Empties the buffer, keeping its storage.
    pub fn reset(&mut self) {
        self.retrieve_all();
    }

    /// Returns the `len` bytes that start at physical offset `start`, split
    /// at the end of the storage.
    pub(crate) fn segments(&self, start: usize, len: usize) -> (&[u8], &[u8]) {
        if len == 0 {
            return (&[], &[]);
        }

        let first = self.buf.len() - start;
        if len <= first {
            (&self.buf[start..start + len], &[])
        } else {
            (&self.buf[start..], &self.buf[..len - first])
        }
    }

    /// Copies `dst.len()` bytes starting at physical offset `start`.
    pub(crate) fn copy_out(&self, start: usize, dst: &mut [u8]) {
        let (head, tail) = self.segments(start, dst.len());
        dst[..head.len()].copy_from_slice(head);
        dst[head.len()..].copy_from_slice(tail);
    }

    pub(crate) fn read_pos(&self) -> usize {
        self.r
    }

    // n must be in 1..=len().
    fn advance_read(&mut self, n: usize) {
        self.r = (self.r + n) % self.buf.len();
        if self.r == self.w {
            self.is_empty = true;
        }
        self.virtual_len = 0;
    }

    /// Reallocates the storage with `deficit` more bytes, moving the readable
    /// bytes to the front.
    fn grow(&mut self, deficit: usize) {
        let old_capacity = self.buf.len();
        let len = self.len();

        let mut storage = vec![0; old_capacity + deficit];
        self.copy_out(self.r, &mut storage[..len]);

        trace!(
            old_capacity,
            new_capacity = storage.len(),
            len,
            "ringbuffer grow"
        );

        self.buf = storage;
        self.r = 0;
        self.w = len;
    }
}

impl io::Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RingBuffer::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(RingBuffer::read(self, buf)?)
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("free", &self.free())
            .field("virtual_len", &self.virtual_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(buf: &RingBuffer) {
        assert_eq!(buf.len() + buf.free(), buf.capacity());
        if buf.r == buf.w {
            assert_ne!(buf.is_empty(), buf.is_full());
        }
    }

    #[test]
    fn test_new_is_empty() {
        let buf = RingBuffer::new(64);
        assert!(buf.is_empty());
        assert!(!buf.is_full());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.free(), 64);
        assert_eq!(buf.capacity(), 64);
        assert_invariants(&buf);
    }

    #[test]
    fn test_write_retrieve_and_fill() {
        let mut buf = RingBuffer::new(64);

        assert_eq!(buf.write(b"abcdabcd"), 8);
        assert_eq!(buf.bytes(), b"abcdabcd");

        buf.retrieve(5);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.free(), 61);
        assert_eq!(buf.bytes(), b"bcd");

        buf.write("abcd".repeat(15).as_bytes());
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.len(), 63);
        assert_eq!(buf.free(), 1);
        assert_eq!(buf.bytes(), format!("bcd{}", "abcd".repeat(15)).as_bytes());
        assert_invariants(&buf);

        buf.retrieve_all();
        buf.write("abcd".repeat(4).as_bytes());
        assert_eq!(buf.len(), 16);
        assert_eq!(buf.free(), 48);
        assert!(!buf.is_empty());
        assert!(!buf.is_full());

        assert_eq!(buf.write("abcd".repeat(12).as_bytes()), 48);
        assert_eq!(buf.len(), 64);
        assert_eq!(buf.free(), 0);
        assert_eq!(buf.w, 0);
        assert!(buf.is_full());
        assert_eq!(buf.bytes(), "abcd".repeat(16).as_bytes());
        assert_invariants(&buf);
    }

    #[test]
    fn test_write_grows_when_full() {
        let mut buf = RingBuffer::new(64);
        buf.write("abcd".repeat(16).as_bytes());
        assert!(buf.is_full());
        assert_eq!(buf.free(), 0);

        buf.write(b"abcd");
        assert_eq!(buf.capacity(), 68);
        assert_eq!(buf.len(), 68);
        assert_eq!(buf.free(), 0);
        assert!(buf.is_full());
        assert_eq!(buf.bytes(), "abcd".repeat(17).as_bytes());
        assert_invariants(&buf);
    }

    #[test]
    fn test_write_after_reset_grows_to_fit() {
        let mut buf = RingBuffer::new(64);
        buf.write(b"xyz");
        buf.reset();

        assert_eq!(buf.write("abcd".repeat(20).as_bytes()), 80);
        assert_eq!(buf.capacity(), 80);
        assert_eq!(buf.len(), 80);
        assert_eq!(buf.w, 0);
        assert!(buf.is_full());
        assert_eq!(buf.bytes(), "abcd".repeat(20).as_bytes());
    }

    #[test]
    fn test_grow_preserves_wrapped_order() {
        let mut buf = RingBuffer::new(8);
        buf.write(b"abcdef");
        buf.retrieve(4);
        buf.write(b"ghij"); // wraps: r=4, w=2
        assert_eq!((buf.r, buf.w), (4, 2));
        assert_eq!(buf.free(), 2);

        buf.write(b"klmnop");
        assert_eq!(buf.capacity(), 8 + (6 - 2));
        assert_eq!(buf.bytes(), b"efghijklmnop");
        assert!(buf.is_full());
        assert_invariants(&buf);
    }

    #[test]
    fn test_write_empty_is_noop() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.write(&[]), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn test_read_empty() {
        let mut buf = RingBuffer::new(64);
        let mut out = vec![0u8; 1024];

        assert_eq!(buf.read(&mut out), Err(BufferError::Empty));
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.free(), 64);
        assert_eq!(buf.r, 0);
    }

    #[test]
    fn test_read_into_empty_slice() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.read(&mut []), Ok(0));

        buf.write(b"ab");
        assert_eq!(buf.read(&mut []), Ok(0));
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_read() {
        let mut buf = RingBuffer::new(64);
        let mut out = vec![0u8; 1024];

        buf.write("abcd".repeat(4).as_bytes());
        assert_eq!(buf.read(&mut out).unwrap(), 16);
        assert_eq!(&out[..16], "abcd".repeat(4).as_bytes());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.free(), 64);
        assert_eq!(buf.r, 16);
        assert!(buf.is_empty());

        // Wraps past the end and grows to 80.
        buf.write("abcd".repeat(20).as_bytes());
        assert_eq!(buf.read(&mut out).unwrap(), 80);
        assert_eq!(&out[..80], "abcd".repeat(20).as_bytes());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.free(), 80);
        assert_eq!(buf.r, 0);
    }

    #[test]
    fn test_partial_read_across_wrap() {
        let mut buf = RingBuffer::new(8);
        buf.write(b"abcdef");
        buf.retrieve(4);
        buf.write(b"ghij");

        let mut out = [0u8; 5];
        assert_eq!(buf.read(&mut out).unwrap(), 5);
        assert_eq!(&out, b"efghi");
        assert_eq!(buf.bytes(), b"j");
        assert_invariants(&buf);
    }

    #[test]
    fn test_byte_interface() {
        let mut buf = RingBuffer::new(2);

        buf.write_byte(b'a');
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.free(), 1);
        assert_eq!(buf.bytes(), b"a");
        assert!(!buf.is_empty());
        assert!(!buf.is_full());

        buf.write_byte(b'b');
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.free(), 0);
        assert!(buf.is_full());

        buf.write_byte(b'c');
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.free(), 0);
        assert_eq!(buf.bytes(), b"abc");
        assert!(buf.is_full());

        assert_eq!(buf.read_byte().unwrap(), b'a');
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.free(), 1);
        assert_eq!(buf.bytes(), b"bc");
        assert!(!buf.is_full());

        assert_eq!(buf.read_byte().unwrap(), b'b');
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.free(), 2);

        assert_eq!(buf.read_byte().unwrap(), b'c');
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.free(), 3);
        assert!(buf.is_empty());
        assert!(!buf.is_full());

        assert_eq!(buf.read_byte(), Err(BufferError::Empty));
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.free(), 3);
    }

    #[test]
    fn test_write_byte_wraps() {
        let mut buf = RingBuffer::new(3);
        buf.write(b"xyz");
        buf.retrieve(2);
        buf.write_byte(b'1');
        buf.write_byte(b'2');
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.bytes(), b"z12");
        assert!(buf.is_full());
    }

    #[test]
    fn test_peek() {
        let mut buf = RingBuffer::new(8);
        buf.write(b"abcdef");
        buf.retrieve(4);
        buf.write(b"ghij");

        assert_eq!(buf.peek(3), (&b"efg"[..], &b""[..]));
        assert_eq!(buf.peek(4), (&b"efgh"[..], &b""[..]));
        assert_eq!(buf.peek(5), (&b"efgh"[..], &b"i"[..]));
        assert_eq!(buf.peek(100), (&b"efgh"[..], &b"ij"[..]));
        assert_eq!(buf.peek_all(), (&b"efgh"[..], &b"ij"[..]));
        assert_eq!(buf.peek(0), (&b""[..], &b""[..]));

        // Cursors untouched
        assert_eq!(buf.len(), 6);
        assert_eq!(buf.bytes(), b"efghij");
    }

    #[test]
    fn test_peek_empty() {
        let buf = RingBuffer::new(8);
        let (head, tail) = buf.peek(4);
        assert!(head.is_empty());
        assert!(tail.is_empty());

        let buf = RingBuffer::new(0);
        assert_eq!(buf.peek_all(), (&b""[..], &b""[..]));
    }

    #[test]
    fn test_peek_full() {
        let mut buf = RingBuffer::new(4);
        buf.write(b"abcd");
        buf.retrieve(2);
        buf.write(b"ef");
        assert!(buf.is_full());
        assert_eq!(buf.peek_all(), (&b"cd"[..], &b"ef"[..]));
        assert_eq!(buf.bytes(), b"cdef");
    }

    #[test]
    fn test_retrieve_clamps() {
        let mut buf = RingBuffer::new(8);
        buf.write(b"abc");
        buf.retrieve(0);
        assert_eq!(buf.len(), 3);

        buf.retrieve(100);
        assert!(buf.is_empty());
        assert_eq!((buf.r, buf.w), (0, 0));

        // No-op on empty buffer
        buf.retrieve(1);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_retrieve_all_is_idempotent() {
        let mut buf = RingBuffer::new(4);
        buf.write(b"abcdefg");
        buf.retrieve_all();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        buf.retrieve_all();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 7);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut buf = RingBuffer::new(4);
        buf.write(b"abcdefgh");
        buf.reset();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.free(), 8);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_vec_takes_ownership() {
        let mut buf = RingBuffer::from_vec(b"hello".to_vec());
        assert!(buf.is_full());
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.bytes(), b"hello");

        let mut out = [0u8; 2];
        buf.read(&mut out).unwrap();
        assert_eq!(&out, b"he");
        buf.write(b"!!");
        assert_eq!(buf.bytes(), b"llo!!");

        let buf = RingBuffer::from(Vec::new());
        assert!(buf.is_empty());
        assert!(!buf.is_full());
    }

    #[test]
    fn test_zero_capacity() {
        let mut buf = RingBuffer::default();
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());
        assert!(!buf.is_full());
        assert_eq!(buf.read_byte(), Err(BufferError::Empty));

        buf.write_byte(b'x');
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.read_byte().unwrap(), b'x');
    }

    #[test]
    fn test_write_str() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.write_str("héllo"), "héllo".len());
        assert_eq!(buf.bytes(), "héllo".as_bytes());
    }

    #[test]
    fn test_io_traits() {
        use std::io::{Read, Write};

        let mut buf = RingBuffer::new(4);
        write!(buf, "n={}", 42).unwrap();
        buf.flush().unwrap();

        let mut out = [0u8; 8];
        assert_eq!(Read::read(&mut buf, &mut out).unwrap(), 4);
        assert_eq!(&out[..4], b"n=42");

        let err = Read::read(&mut buf, &mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn test_debug_summary() {
        let mut buf = RingBuffer::new(8);
        buf.write(b"abc");
        let s = format!("{:?}", buf);
        assert!(s.contains("capacity: 8"));
        assert!(s.contains("len: 3"));
        assert!(s.contains("free: 5"));
    }
}
