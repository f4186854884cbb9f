// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::iter;

use tracing::{Level, event};

use crate::ring::{grown_capacity, physical, relocations, segments};

/// A growable circular buffer of elements, appended at the back and evicted from the front.
///
/// Evicting elements only moves the logical start of the buffer; retained elements never shift.
/// When an append does not fit, the storage grows while keeping the physical position of the
/// first element, so elements already in the buffer keep their order even if the valid window
/// wraps around the physical end of the storage.
///
/// ```
/// use wirebuf::RingBuffer;
///
/// let mut ring = RingBuffer::with_capacity(4);
///
/// ring.add("a");
/// ring.add_all(&["b", "c", "d"]);
/// assert_eq!(ring.remove(2), 2);
///
/// // Wraps around the end of the storage without moving "c" and "d".
/// ring.add_all(&["e", "f"]);
///
/// let mut peeked = [""; 4];
/// assert_eq!(ring.get(&mut peeked, 0, 4), 4);
/// assert_eq!(peeked, ["c", "d", "e", "f"]);
/// ```
///
/// Bulk operations that receive a range outside the slice they refer to do not fail: they
/// process zero elements, which suits best-effort batch producers.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    // Only the `count` slots starting at `start` are `Some`.
    storage: Box<[Option<T>]>,
    start: usize,
    count: usize,
}

impl<T> RingBuffer<T> {
    /// The capacity of a buffer created via [`new()`][Self::new].
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Creates an empty ring with [`DEFAULT_CAPACITY`][Self::DEFAULT_CAPACITY] slots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty ring with `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: empty_slots(capacity),
            start: 0,
            count: 0,
        }
    }

    /// The number of elements in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the ring holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The number of elements the ring can hold before it has to grow. Never decreases.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Appends an element at the back, growing the storage first if the ring is full.
    pub fn add(&mut self, item: T) {
        self.reserve(1);

        let tail = physical(self.start, self.count, self.capacity());
        self.storage[tail] = Some(item);
        self.count += 1;
    }

    /// Evicts up to `count` elements from the front and returns how many were evicted.
    pub fn remove(&mut self, count: usize) -> usize {
        let removed = count.min(self.count);

        if removed == 0 {
            return 0;
        }

        let capacity = self.capacity();
        let (head, tail) = segments(self.start, removed, capacity);

        // Evicted elements are dropped now rather than when their slot is reused.
        self.storage[head].fill_with(|| None);
        self.storage[tail].fill_with(|| None);

        self.start = physical(self.start, removed, capacity);
        self.count -= removed;
        removed
    }

    /// Evicts every element.
    pub fn clear(&mut self) {
        self.remove(self.count);
    }

    /// Borrows the element at logical `index`, counting from the front.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<&T> {
        if index >= self.count {
            return None;
        }

        self.storage[physical(self.start, index, self.capacity())].as_ref()
    }

    /// Iterates over the elements from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (head, tail) = segments(self.start, self.count, self.capacity());

        self.storage[head].iter().chain(&self.storage[tail]).flatten()
    }

    /// Makes room for `additional` more elements.
    fn reserve(&mut self, additional: usize) {
        let capacity = self.capacity();
        let required = self.count.saturating_add(additional);

        if required > capacity {
            self.expand(grown_capacity(capacity, required) - capacity);
        }
    }

    /// Grows the storage by `extra` slots, keeping `start` and the logical order of the elements.
    fn expand(&mut self, extra: usize) {
        let old_capacity = self.capacity();
        let mut storage = empty_slots(old_capacity + extra);

        for relocation in relocations(self.start, self.count, old_capacity, extra) {
            let moved = storage[relocation.dst_range()].iter_mut().zip(&mut self.storage[relocation.src]);

            for (dst, src) in moved {
                *dst = src.take();
            }
        }

        self.storage = storage;

        event!(
            Level::TRACE,
            message = "grew ring buffer",
            old_capacity,
            new_capacity = self.capacity(),
            len = self.count
        );
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Appends clones of all `items` at the back and returns how many were appended.
    pub fn add_all(&mut self, items: &[T]) -> usize {
        self.add_range(items, 0, items.len())
    }

    /// Appends clones of `length` elements of `items`, starting at `offset`, and returns how many
    /// were appended.
    ///
    /// Returns 0 without changing the ring if `length` is 0 or the range does not lie within
    /// `items`. Otherwise all elements are appended, growing the storage if necessary.
    pub fn add_range(&mut self, items: &[T], offset: usize, length: usize) -> usize {
        if length == 0 {
            return 0;
        }

        let Some(src) = offset.checked_add(length).and_then(|end| items.get(offset..end)) else {
            event!(
                Level::DEBUG,
                message = "ignored ring buffer append with invalid range",
                offset,
                length,
                available = items.len()
            );
            return 0;
        };

        self.reserve(length);

        let capacity = self.capacity();
        let (head, tail) = segments(physical(self.start, self.count, capacity), length, capacity);
        let (src_head, src_tail) = src.split_at(head.len());

        for (slot, item) in self.storage[head].iter_mut().zip(src_head) {
            *slot = Some(item.clone());
        }

        for (slot, item) in self.storage[tail].iter_mut().zip(src_tail) {
            *slot = Some(item.clone());
        }

        self.count += length;
        length
    }

    /// Copies up to `length` elements from the front of the ring into `dst`, starting at
    /// `offset`, without evicting them. Returns how many were copied.
    ///
    /// Returns 0 if `length` is 0 or the range does not lie within `dst`.
    pub fn get(&self, dst: &mut [T], offset: usize, length: usize) -> usize {
        if length == 0 {
            return 0;
        }

        let available = dst.len();

        let Some(dst) = offset.checked_add(length).and_then(|end| dst.get_mut(offset..end)) else {
            event!(
                Level::DEBUG,
                message = "ignored ring buffer copy with invalid range",
                offset,
                length,
                available
            );
            return 0;
        };

        let copied = length.min(self.count);
        let (head, tail) = segments(self.start, copied, self.capacity());
        let (dst_head, dst_rest) = dst.split_at_mut(head.len());

        for (dst, src) in dst_head.iter_mut().zip(self.storage[head].iter().flatten()) {
            dst.clone_from(src);
        }

        for (dst, src) in dst_rest.iter_mut().zip(self.storage[tail].iter().flatten()) {
            dst.clone_from(src);
        }

        copied
    }

    /// Clones the elements into a vector, from front to back.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for item in iter {
            self.add(item);
        }
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    iter::repeat_with(|| None).take(capacity).collect()
}
