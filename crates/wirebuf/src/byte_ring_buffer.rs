// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;

use tracing::{Level, event};

use crate::ring::{grown_capacity, physical, relocations, segments};
use crate::{BinaryBuffer, Result};

/// A growable circular buffer of bytes, appended at the back and evicted from the front.
///
/// This is the byte-specialized counterpart of [`RingBuffer`][crate::RingBuffer]. It follows the
/// same layout and growth rules but keeps the bytes unboxed, copies them in bulk, and can transfer
/// them straight into external byte sinks:
///
/// * [`get_into_buffer()`][Self::get_into_buffer] appends to a [`BinaryBuffer`].
/// * [`write_to()`][Self::write_to] writes to any [`std::io::Write`].
/// * `get_into_buf_mut()` (with the `bytes-compat` feature) appends to any `bytes::BufMut`.
///
/// ```
/// use wirebuf::ByteRingBuffer;
///
/// let mut ring = ByteRingBuffer::with_capacity(8);
///
/// ring.add_all(b"header:");
/// ring.remove(7);
/// ring.add_all(b"body");
///
/// let mut sink = Vec::new();
/// assert_eq!(ring.write_to(&mut sink, 16)?, 4);
/// assert_eq!(sink, b"body");
/// # Ok::<(), wirebuf::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ByteRingBuffer {
    storage: Box<[u8]>,
    start: usize,
    count: usize,
}

impl ByteRingBuffer {
    /// The capacity of a buffer created via [`new()`][Self::new].
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Creates an empty ring with [`DEFAULT_CAPACITY`][Self::DEFAULT_CAPACITY] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty ring with `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity].into_boxed_slice(),
            start: 0,
            count: 0,
        }
    }

    /// The number of bytes in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the ring holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The number of bytes the ring can hold before it has to grow. Never decreases.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Appends a byte at the back, growing the storage first if the ring is full.
    pub fn add(&mut self, byte: u8) {
        self.reserve(1);

        let tail = physical(self.start, self.count, self.capacity());
        self.storage[tail] = byte;
        self.count += 1;
    }

    /// Appends all of `bytes` at the back and returns how many were appended.
    pub fn add_all(&mut self, bytes: &[u8]) -> usize {
        self.add_range(bytes, 0, bytes.len())
    }

    /// Appends `length` bytes of `bytes`, starting at `offset`, and returns how many were
    /// appended.
    ///
    /// Returns 0 without changing the ring if `length` is 0 or the range does not lie within
    /// `bytes`. Otherwise all bytes are appended, growing the storage if necessary.
    pub fn add_range(&mut self, bytes: &[u8], offset: usize, length: usize) -> usize {
        if length == 0 {
            return 0;
        }

        let Some(src) = offset.checked_add(length).and_then(|end| bytes.get(offset..end)) else {
            event!(
                Level::DEBUG,
                message = "ignored byte ring append with invalid range",
                offset,
                length,
                available = bytes.len()
            );
            return 0;
        };

        self.reserve(length);

        let capacity = self.capacity();
        let (head, tail) = segments(physical(self.start, self.count, capacity), length, capacity);
        let (src_head, src_tail) = src.split_at(head.len());

        self.storage[head].copy_from_slice(src_head);
        self.storage[tail].copy_from_slice(src_tail);

        self.count += length;
        length
    }

    /// Evicts up to `count` bytes from the front and returns how many were evicted.
    ///
    /// Evicted bytes stay in the storage until overwritten but can no longer be observed.
    pub fn remove(&mut self, count: usize) -> usize {
        let removed = count.min(self.count);

        if removed == 0 {
            return 0;
        }

        self.start = physical(self.start, removed, self.capacity());
        self.count -= removed;
        removed
    }

    /// Evicts every byte.
    pub fn clear(&mut self) {
        self.remove(self.count);
    }

    /// The byte at logical `index`, counting from the front.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<u8> {
        (index < self.count).then(|| self.storage[physical(self.start, index, self.capacity())])
    }

    /// Borrows the bytes as two slices that, concatenated, hold the ring contents in order.
    ///
    /// The second slice is empty unless the contents wrap around the end of the storage.
    #[must_use]
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        self.front_slices(self.count)
    }

    /// Copies the bytes into a vector, from front to back.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let (head, tail) = self.as_slices();
        [head, tail].concat()
    }

    /// Copies up to `length` bytes from the front of the ring into `dst`, starting at `offset`,
    /// without evicting them. Returns how many were copied.
    ///
    /// Returns 0 if `length` is 0 or the range does not lie within `dst`.
    pub fn get(&self, dst: &mut [u8], offset: usize, length: usize) -> usize {
        if length == 0 {
            return 0;
        }

        let available = dst.len();

        let Some(dst) = offset.checked_add(length).and_then(|end| dst.get_mut(offset..end)) else {
            event!(
                Level::DEBUG,
                message = "ignored byte ring copy with invalid range",
                offset,
                length,
                available
            );
            return 0;
        };

        let (head, tail) = self.front_slices(length);
        let (dst_head, dst_rest) = dst.split_at_mut(head.len());

        dst_head.copy_from_slice(head);
        dst_rest[..tail.len()].copy_from_slice(tail);

        head.len() + tail.len()
    }

    /// Appends up to `length` bytes from the front of the ring to `dst` at its cursor, without
    /// evicting them. Returns how many were appended.
    ///
    /// # Errors
    ///
    /// Fails like [`BinaryBuffer::write_bytes()`], in which case nothing is appended.
    pub fn get_into_buffer(&self, dst: &mut BinaryBuffer, length: usize) -> Result<usize> {
        let (head, tail) = self.front_slices(length);
        let copied = head.len() + tail.len();

        dst.write_with(copied, |out| {
            let (out_head, out_tail) = out.split_at_mut(head.len());
            out_head.copy_from_slice(head);
            out_tail.copy_from_slice(tail);
        })?;

        Ok(copied)
    }

    /// Writes up to `length` bytes from the front of the ring to `sink`, without evicting them.
    /// Returns how many were written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`][crate::Error::Io] if the sink fails to accept all of the bytes.
    pub fn write_to(&self, sink: &mut impl io::Write, length: usize) -> Result<usize> {
        let (head, tail) = self.front_slices(length);

        sink.write_all(head)?;
        sink.write_all(tail)?;

        Ok(head.len() + tail.len())
    }

    /// The first `min(length, len())` bytes, split at the physical end of the storage.
    pub(crate) fn front_slices(&self, length: usize) -> (&[u8], &[u8]) {
        let (head, tail) = segments(self.start, length.min(self.count), self.capacity());
        (&self.storage[head], &self.storage[tail])
    }

    fn reserve(&mut self, additional: usize) {
        let capacity = self.capacity();
        let required = self.count.saturating_add(additional);

        if required > capacity {
            self.expand(grown_capacity(capacity, required) - capacity);
        }
    }

    fn expand(&mut self, extra: usize) {
        let old_capacity = self.capacity();
        let mut storage = vec![0; old_capacity + extra].into_boxed_slice();

        for relocation in relocations(self.start, self.count, old_capacity, extra) {
            storage[relocation.dst_range()].copy_from_slice(&self.storage[relocation.src]);
        }

        self.storage = storage;

        event!(
            Level::TRACE,
            message = "grew byte ring",
            old_capacity,
            new_capacity = self.capacity(),
            len = self.count
        );
    }
}

impl Default for ByteRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<u8> for ByteRingBuffer {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for byte in iter {
            self.add(byte);
        }
    }
}
