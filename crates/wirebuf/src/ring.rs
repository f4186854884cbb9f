// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Layout arithmetic shared by [`RingBuffer`][crate::RingBuffer] and
//! [`ByteRingBuffer`][crate::ByteRingBuffer].
//!
//! A ring stores its `count` valid slots starting at physical index `start` of a `capacity`-slot
//! array, wrapping to index 0 when they reach the physical end. Any run of slots therefore
//! occupies at most two contiguous physical ranges: a head segment that ends no later than the
//! physical end, and a tail segment that starts at index 0. Every copy into or out of a ring goes
//! through [`segments()`] so that this split is computed in exactly one place.

use std::ops::Range;

/// Splits a run of `len` slots starting at physical index `start` into its head segment and its
/// wrapped tail segment. The tail is empty if the run does not wrap.
pub(crate) fn segments(start: usize, len: usize, capacity: usize) -> (Range<usize>, Range<usize>) {
    debug_assert!(len <= capacity);
    debug_assert!(start < capacity || capacity == 0);

    let head_len = len.min(capacity - start);

    (start..start + head_len, 0..len - head_len)
}

/// Physical index of logical slot `logical` in a ring whose first slot is at `start`.
pub(crate) fn physical(start: usize, logical: usize, capacity: usize) -> usize {
    debug_assert!(capacity > 0);

    // Computed without `start + logical` to stay clear of overflow.
    let to_end = capacity - start;

    if logical < to_end { start + logical } else { logical - to_end }
}

/// The capacity a ring of `capacity` slots grows to when it must hold `required` slots.
///
/// Growth at least doubles the capacity so that repeated single-slot appends stay amortized O(1).
pub(crate) fn grown_capacity(capacity: usize, required: usize) -> usize {
    required.max(capacity.saturating_mul(2)).max(1)
}

/// One contiguous block of slots to carry over from the old storage to the new one when a ring
/// grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relocation {
    /// Physical range in the old storage.
    pub(crate) src: Range<usize>,
    /// Physical index in the new storage where the block starts.
    pub(crate) dst: usize,
}

impl Relocation {
    pub(crate) fn dst_range(&self) -> Range<usize> {
        self.dst..self.dst + self.src.len()
    }
}

/// Plans how the valid window of a ring moves when its storage grows from `capacity` to
/// `capacity + extra` slots, keeping `start` where it is.
///
/// * The head segment stays at the same physical indexes.
/// * The wrapped tail segment (if any) moves into the new slots right after the old physical end.
/// * If the wrapped tail is longer than `extra`, whatever does not fit there wraps again and
///   lands at index 0 of the new storage.
///
/// Empty relocations are included to keep the shape fixed; copying them is a no-op.
pub(crate) fn relocations(start: usize, count: usize, capacity: usize, extra: usize) -> [Relocation; 3] {
    let (head, tail) = segments(start, count, capacity);
    let moved_past_end = tail.len().min(extra);

    [
        Relocation {
            dst: head.start,
            src: head,
        },
        Relocation {
            src: 0..moved_past_end,
            dst: capacity,
        },
        Relocation {
            src: moved_past_end..tail.end,
            dst: 0,
        },
    ]
}
