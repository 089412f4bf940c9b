//! Thread-safe ring buffer.

use std::fmt;
use std::io;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::ring_buffer::RingBuffer;

/// A thread-safe [`RingBuffer`].
///
/// Every operation holds a single lock from start to finish, including the
/// reallocation a write may trigger, so no caller ever observes a buffer in
/// the middle of growing. Nothing blocks waiting for data or space: an empty
/// buffer reports [`BufferError::Empty`](crate::BufferError::Empty) right away.
///
/// Cloning shares the underlying buffer via `Arc`.
///
/// # Example
///
/// ```
/// use giztoy_ringbuffer::SyncRingBuffer;
/// use std::thread;
///
/// let buf = SyncRingBuffer::new(16);
/// let producer_buf = buf.clone();
///
/// thread::spawn(move || {
///     producer_buf.write(b"hello");
/// })
/// .join()
/// .unwrap();
///
/// let mut out = [0u8; 5];
/// assert_eq!(buf.read(&mut out).unwrap(), 5);
/// assert_eq!(&out, b"hello");
/// ```
#[derive(Clone)]
pub struct SyncRingBuffer {
    inner: Arc<Mutex<RingBuffer>>,
}

impl From<RingBuffer> for SyncRingBuffer {
    fn from(buf: RingBuffer) -> Self {
        SyncRingBuffer {
            inner: Arc::new(Mutex::new(buf)),
        }
    }
}

impl Default for SyncRingBuffer {
    fn default() -> Self {
        RingBuffer::default().into()
    }
}

impl SyncRingBuffer {
    /// Creates an empty buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        RingBuffer::new(capacity).into()
    }

    /// Locks the buffer for a compound operation.
    ///
    /// Use this when several calls must happen atomically, e.g. a virtual
    /// read followed by a flush or revert. Every other method on this type
    /// takes the same lock, so do not call them while holding the guard.
    pub fn lock(&self) -> MutexGuard<'_, RingBuffer> {
        self.inner.lock()
    }

    /// Returns the buffer if this is the only handle left.
    pub fn into_inner(self) -> std::result::Result<RingBuffer, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner()),
            Err(inner) => Err(SyncRingBuffer { inner }),
        }
    }

    /// See [`RingBuffer::write`].
    pub fn write(&self, data: &[u8]) -> usize {
        self.inner.lock().write(data)
    }

    /// See [`RingBuffer::write_str`].
    pub fn write_str(&self, s: &str) -> usize {
        self.inner.lock().write_str(s)
    }

    /// See [`RingBuffer::write_byte`].
    pub fn write_byte(&self, b: u8) {
        self.inner.lock().write_byte(b)
    }

    /// See [`RingBuffer::read`].
    pub fn read(&self, dst: &mut [u8]) -> Result<usize> {
        self.inner.lock().read(dst)
    }

    /// See [`RingBuffer::read_byte`].
    pub fn read_byte(&self) -> Result<u8> {
        self.inner.lock().read_byte()
    }

    /// Calls `f` with up to `n` readable bytes, holding the lock meanwhile.
    ///
    /// See [`RingBuffer::peek`] for the meaning of the two segments.
    pub fn peek_with<R>(&self, n: usize, f: impl FnOnce(&[u8], &[u8]) -> R) -> R {
        let buf = self.inner.lock();
        let (head, tail) = buf.peek(n);
        f(head, tail)
    }

    /// Calls `f` with every readable byte, holding the lock meanwhile.
    pub fn peek_all_with<R>(&self, f: impl FnOnce(&[u8], &[u8]) -> R) -> R {
        let buf = self.inner.lock();
        let (head, tail) = buf.peek_all();
        f(head, tail)
    }

    /// See [`RingBuffer::retrieve`].
    pub fn retrieve(&self, n: usize) {
        self.inner.lock().retrieve(n)
    }

    /// See [`RingBuffer::retrieve_all`].
    pub fn retrieve_all(&self) {
        self.inner.lock().retrieve_all()
    }

    /// See [`RingBuffer::bytes`].
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.lock().bytes()
    }

    /// See [`RingBuffer::virtual_read`].
    pub fn virtual_read(&self, dst: &mut [u8]) -> Result<usize> {
        self.inner.lock().virtual_read(dst)
    }

    /// See [`RingBuffer::virtual_len`].
    pub fn virtual_len(&self) -> usize {
        self.inner.lock().virtual_len()
    }

    /// See [`RingBuffer::virtual_flush`].
    pub fn virtual_flush(&self) {
        self.inner.lock().virtual_flush()
    }

    /// See [`RingBuffer::virtual_revert`].
    pub fn virtual_revert(&self) {
        self.inner.lock().virtual_revert()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn free(&self) -> usize {
        self.inner.lock().free()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    pub fn reset(&self) {
        self.inner.lock().reset()
    }
}

impl io::Write for SyncRingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(SyncRingBuffer::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for SyncRingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(SyncRingBuffer::read(self, buf)?)
    }
}

impl fmt::Debug for SyncRingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("SyncRingBuffer");
        match self.inner.try_lock() {
            Some(buf) => d.field("inner", &*buf),
            None => d.field("inner", &format_args!("<locked>")),
        };
        d.finish()
    }
}
