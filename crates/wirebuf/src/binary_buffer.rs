// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;

use tracing::{Level, event};

use crate::{Error, Result};

/// The largest capacity a buffer may grow to, matching the allocation limit of `Vec<u8>`.
const MAX_CAPACITY: usize = isize::MAX.unsigned_abs();

/// A growable, position-addressed byte store for big-endian binary encoding.
///
/// The buffer tracks two offsets into its storage:
///
/// * The *position* is the cursor at which the next read or write takes place.
/// * The *size* is one past the highest byte index ever written since the last [`clear()`].
///   It only moves forward when a write extends past it.
///
/// The invariant `position <= size <= capacity` always holds. Writes may happen anywhere up to
/// the current size, overwriting existing bytes, and grow the storage when they would run past the
/// end of it. Reads never go past the size.
///
/// ```
/// use wirebuf::BinaryBuffer;
///
/// let mut buffer = BinaryBuffer::with_capacity(8);
///
/// buffer.write_i32(-1)?;
/// buffer.write_utf("header")?;
/// buffer.write_f64(2.5)?;
///
/// buffer.set_position(0)?;
///
/// assert_eq!(buffer.read_i32()?, -1);
/// assert_eq!(buffer.read_utf()?, "header");
/// assert_eq!(buffer.read_f64()?, 2.5);
/// assert_eq!(buffer.remaining(), 0);
/// # Ok::<(), wirebuf::Error>(())
/// ```
///
/// # Closing
///
/// [`close()`] releases the storage. Every later operation that reads, writes or moves the
/// cursor fails with [`Error::Closed`]; the size/position queries report zero.
///
/// [`clear()`]: Self::clear
/// [`close()`]: Self::close
#[derive(Clone, Debug)]
pub struct BinaryBuffer {
    // `len()` of the vector is the capacity; every byte is initialized.
    storage: Option<Vec<u8>>,
    position: usize,
    size: usize,
}

impl BinaryBuffer {
    /// The capacity of a buffer created via [`new()`][Self::new].
    pub const DEFAULT_CAPACITY: usize = 32;

    /// Creates an empty buffer with [`DEFAULT_CAPACITY`][Self::DEFAULT_CAPACITY] bytes of storage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty buffer with `capacity` bytes of storage.
    ///
    /// The storage grows on demand, so the capacity is only a starting point.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Some(vec![0; capacity]),
            position: 0,
            size: 0,
        }
    }

    /// Creates a buffer positioned at the start of existing data, ready for reading.
    ///
    /// ```
    /// use wirebuf::BinaryBuffer;
    ///
    /// let mut buffer = BinaryBuffer::from_vec(vec![0x00, 0x2A]);
    /// assert_eq!(buffer.size(), 2);
    /// assert_eq!(buffer.read_i16()?, 42);
    /// # Ok::<(), wirebuf::Error>(())
    /// ```
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let size = bytes.len();

        Self {
            storage: Some(bytes),
            position: 0,
            size,
        }
    }

    /// The cursor at which the next read or write takes place.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `position` is greater than [`size()`][Self::size]
    /// and [`Error::Closed`] if the buffer has been closed.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        self.seek_to(Some(position))
    }

    /// Advances the cursor by `count` bytes without reading them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the cursor would move past [`size()`][Self::size]
    /// and [`Error::Closed`] if the buffer has been closed.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.seek_to(self.position.checked_add(count))
    }

    /// Every cursor move goes through here so that all of them enforce the same bounds.
    ///
    /// `None` stands for a target that overflowed while being computed.
    fn seek_to(&mut self, target: Option<usize>) -> Result<()> {
        if self.storage.is_none() {
            return Err(Error::Closed);
        }

        match target {
            Some(target) if target <= self.size => {
                self.position = target;
                Ok(())
            }
            _ => Err(Error::IndexOutOfBounds {
                index: target.unwrap_or(usize::MAX),
                len: self.size,
            }),
        }
    }

    /// One past the highest byte index written since the buffer was created or last cleared.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of bytes between the cursor and [`size()`][Self::size].
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.size - self.position
    }

    /// The number of bytes the storage can hold before it has to grow. Zero once closed.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().map_or(0, Vec::len)
    }

    /// Whether [`close()`][Self::close] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.storage.is_none()
    }

    /// Resets the cursor and the size to zero.
    ///
    /// The storage is retained as-is; old bytes are not zeroed but can no longer be read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the buffer has been closed.
    pub fn clear(&mut self) -> Result<()> {
        if self.storage.is_none() {
            return Err(Error::Closed);
        }

        self.position = 0;
        self.size = 0;
        Ok(())
    }

    /// Releases the storage. The buffer cannot be used for reading or writing afterwards.
    ///
    /// Closing an already closed buffer does nothing.
    pub fn close(&mut self) {
        if let Some(storage) = self.storage.take() {
            event!(Level::TRACE, message = "closed binary buffer", capacity = storage.len(), size = self.size);
        }

        self.position = 0;
        self.size = 0;
    }

    /// Borrows the bytes between the cursor and [`size()`][Self::size].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the buffer has been closed.
    pub fn as_slice(&self) -> Result<&[u8]> {
        let storage = self.storage.as_deref().ok_or(Error::Closed)?;
        Ok(&storage[self.position..self.size])
    }

    /// Copies the bytes between the cursor and [`size()`][Self::size] into a new vector.
    ///
    /// The cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the buffer has been closed.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        self.as_slice().map(<[u8]>::to_vec)
    }

    /// Writes the bytes between the cursor and [`size()`][Self::size] to `sink`, returning how
    /// many bytes were written.
    ///
    /// The cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the buffer has been closed and [`Error::Io`] if the sink
    /// fails to accept all of the bytes.
    pub fn write_to(&self, sink: &mut impl io::Write) -> Result<usize> {
        let bytes = self.as_slice()?;
        sink.write_all(bytes)?;
        Ok(bytes.len())
    }

    /// Runs `f` over `len` bytes of storage starting at the cursor, then advances the cursor
    /// (and the size, if the cursor passes it) by `len`.
    ///
    /// The storage grows first if necessary. On failure nothing is written and the buffer is
    /// left unchanged.
    pub(crate) fn write_with(&mut self, len: usize, f: impl FnOnce(&mut [u8])) -> Result<()> {
        self.ensure_capacity(len)?;

        let storage = self.storage.as_deref_mut().ok_or(Error::Closed)?;
        let end = self.position + len;

        f(&mut storage[self.position..end]);

        self.position = end;
        self.size = self.size.max(end);
        Ok(())
    }

    /// Runs `f` over the `len` bytes following the cursor, then advances the cursor by `len`.
    ///
    /// On failure the cursor does not move.
    pub(crate) fn read_with<R>(&mut self, len: usize, f: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let storage = self.storage.as_deref().ok_or(Error::Closed)?;
        let available = self.size - self.position;

        if available < len {
            return Err(Error::Underflow { needed: len, available });
        }

        let end = self.position + len;
        let result = f(&storage[self.position..end]);

        self.position = end;
        Ok(result)
    }

    /// Makes sure `additional` bytes fit at the cursor.
    ///
    /// The new capacity is `max(position + additional, 2 * capacity)`, capped at the allocation
    /// limit.
    fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        let position = self.position;
        let overflow = || Error::Overflow { position, additional };

        let storage = self.storage.as_mut().ok_or(Error::Closed)?;

        let required = position
            .checked_add(additional)
            .filter(|required| *required <= MAX_CAPACITY)
            .ok_or_else(overflow)?;

        let old_capacity = storage.len();

        if required <= old_capacity {
            return Ok(());
        }

        let new_capacity = required.max(old_capacity.saturating_mul(2).min(MAX_CAPACITY));

        storage.try_reserve_exact(new_capacity - old_capacity).map_err(|e| {
            event!(Level::DEBUG, message = "binary buffer allocation failed", new_capacity, error = %e);
            overflow()
        })?;
        storage.resize(new_capacity, 0);

        event!(Level::TRACE, message = "grew binary buffer", old_capacity, new_capacity);

        Ok(())
    }
}

impl Default for BinaryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
