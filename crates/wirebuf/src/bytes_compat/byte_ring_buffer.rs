// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::IoSlice;

use bytes::{Buf, BufMut};

use crate::ByteRingBuffer;

impl ByteRingBuffer {
    /// Appends up to `length` bytes from the front of the ring to `dst`, without evicting them.
    /// Returns how many were appended.
    ///
    /// The count is also limited by [`BufMut::remaining_mut()`] of `dst`.
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use wirebuf::ByteRingBuffer;
    ///
    /// let mut ring = ByteRingBuffer::new();
    /// ring.add_all(b"payload");
    ///
    /// let mut dst = BytesMut::new();
    /// assert_eq!(ring.get_into_buf_mut(&mut dst, 4), 4);
    /// assert_eq!(&dst[..], b"payl");
    /// ```
    pub fn get_into_buf_mut(&self, dst: &mut impl BufMut, length: usize) -> usize {
        let (head, tail) = self.front_slices(length.min(dst.remaining_mut()));

        dst.put_slice(head);
        dst.put_slice(tail);

        head.len() + tail.len()
    }
}

/// Consumes the ring from the front, evicting bytes as they are advanced past.
impl Buf for ByteRingBuffer {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn remaining(&self) -> usize {
        self.len()
    }

    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn chunk(&self) -> &[u8] {
        self.as_slices().0
    }

    fn chunks_vectored<'a>(&'a self, dst: &mut [IoSlice<'a>]) -> usize {
        let mut filled = 0;

        let (head, tail) = self.as_slices();

        for (slot, slice) in dst.iter_mut().zip([head, tail].into_iter().filter(|slice| !slice.is_empty())) {
            *slot = IoSlice::new(slice);
            filled += 1;
        }

        filled
    }

    fn advance(&mut self, cnt: usize) {
        assert!(cnt <= self.len(), "cannot advance {cnt} bytes past the end of the data");

        self.remove(cnt);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::*;

    /// A ring of capacity 4 holding `b"abcd"` with `ab` at the physical end and `cd` wrapped.
    fn wrapped() -> ByteRingBuffer {
        let mut ring = ByteRingBuffer::with_capacity(4);
        ring.add_all(b"xxab");
        ring.remove(2);
        ring.add_all(b"cd");
        ring
    }

    #[test]
    fn buf_compat() {
        let mut ring = wrapped();

        assert_eq!(Buf::remaining(&ring), 4);
        assert_eq!(Buf::chunk(&ring), b"ab");

        Buf::advance(&mut ring, 1);
        assert_eq!(Buf::chunk(&ring), b"b");

        Buf::advance(&mut ring, 1);
        assert_eq!(Buf::chunk(&ring), b"cd");

        // Reads that span the wrap point are stitched together by the trait.
        let mut ring = wrapped();
        assert_eq!(ring.get_u32(), u32::from_be_bytes(*b"abcd"));
        assert!(ring.is_empty());
    }

    #[test]
    fn chunks_vectored_covers_both_segments() {
        let ring = wrapped();
        let mut slices = [IoSlice::new(&[]); 4];

        assert_eq!(ring.chunks_vectored(&mut slices), 2);
        assert_eq!(&*slices[0], b"ab");
        assert_eq!(&*slices[1], b"cd");

        let mut one = [IoSlice::new(&[])];
        assert_eq!(ring.chunks_vectored(&mut one), 1);
        assert_eq!(&*one[0], b"ab");

        assert_eq!(ByteRingBuffer::new().chunks_vectored(&mut slices), 0);
    }

    #[test]
    #[should_panic]
    fn advance_past_end_panics() {
        let mut ring = wrapped();
        Buf::advance(&mut ring, 5);
    }

    #[test]
    fn get_into_buf_mut_across_wrap() {
        let ring = wrapped();
        let mut dst = BytesMut::new();

        assert_eq!(ring.get_into_buf_mut(&mut dst, 10), 4);
        assert_eq!(&dst[..], b"abcd");
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn get_into_buf_mut_respects_remaining_mut() {
        let ring = wrapped();
        let mut storage = [0_u8; 3];
        let mut dst = &mut storage[..];

        assert_eq!(ring.get_into_buf_mut(&mut dst, 4), 3);
        assert_eq!(&storage, b"abc");
    }
}
