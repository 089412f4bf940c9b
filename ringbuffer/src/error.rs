//! Error types for ring buffer operations.

use std::io;

/// Result type alias for ring buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;

/// Ring buffer operation error.
///
/// `Empty` is the only error the buffer algorithm itself produces. It is
/// always recoverable: the caller should retry after more data is written.
/// There is no "full" error, writes grow the buffer instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// A read was requested but no bytes are available.
    #[error("ringbuffer: empty")]
    Empty,

    /// A pool configuration was rejected.
    #[error("ringbuffer: invalid config: {0}")]
    InvalidConfig(String),
}

impl BufferError {
    /// Returns true if this is the recoverable "no data yet" condition.
    pub fn is_empty(&self) -> bool {
        matches!(self, BufferError::Empty)
    }
}

impl From<BufferError> for io::Error {
    fn from(err: BufferError) -> Self {
        match err {
            // Ok(0) would read as EOF to io::Read callers.
            BufferError::Empty => io::Error::new(io::ErrorKind::WouldBlock, err),
            BufferError::InvalidConfig(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
        }
    }
}
