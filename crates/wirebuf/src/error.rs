// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// Any error that may arise from encoding into or decoding from the buffers in this crate.
///
/// Ring buffer bulk operations that receive a malformed range do not use this type. They report
/// zero elements processed instead, so best-effort batch producers need no error handling.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A cursor, offset or range falls outside the valid bounds of a buffer or slice.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The offending index (for a range, its exclusive end).
        index: usize,
        /// The length the index was checked against.
        len: usize,
    },

    /// Fewer bytes remain before the end of the data than the operation requires.
    #[error("buffer underflow: needed {needed} bytes but only {available} remain")]
    Underflow {
        /// Bytes required by the operation.
        needed: usize,
        /// Bytes remaining between the cursor and the end of the data.
        available: usize,
    },

    /// Growing the storage to the required size is not possible without overflowing the maximum
    /// representable or allocatable size. The buffer is left unchanged.
    #[error("buffer overflow: cannot grow to hold {additional} more bytes at position {position}")]
    Overflow {
        /// Cursor position at which the write was attempted.
        position: usize,
        /// Bytes the write needed to append.
        additional: usize,
    },

    /// A string payload does not fit the 2-byte length prefix, or encoded bytes violate the
    /// modified UTF-8 grammar.
    #[error("malformed string data: {0}")]
    Format(String),

    /// The buffer has been closed and its storage released.
    #[error("buffer is closed")]
    Closed,

    /// We are forwarding an error received from an external byte sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` for use with buffer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a buffer error as a standard I/O error.
/// This is used by the `std::io` adapters of the buffer types.
impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(error) => error,
            Error::Underflow { .. } => Self::new(std::io::ErrorKind::UnexpectedEof, value),
            Error::Format(_) => Self::new(std::io::ErrorKind::InvalidData, value),
            Error::IndexOutOfBounds { .. } => Self::new(std::io::ErrorKind::InvalidInput, value),
            Error::Overflow { .. } => Self::new(std::io::ErrorKind::OutOfMemory, value),
            Error::Closed => Self::new(std::io::ErrorKind::NotConnected, value),
        }
    }
}
