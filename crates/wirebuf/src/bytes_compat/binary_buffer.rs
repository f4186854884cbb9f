// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::Buf;

use crate::BinaryBuffer;

/// Consumes the bytes between the cursor and the size. A closed buffer has nothing to consume.
impl Buf for BinaryBuffer {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn remaining(&self) -> usize {
        Self::remaining(self)
    }

    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn chunk(&self) -> &[u8] {
        self.as_slice().unwrap_or_default()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= Self::remaining(self),
            "cannot advance {cnt} bytes past the end of the data"
        );

        // Only fails when closed, in which case `cnt` is zero and there is nothing to do.
        _ = self.skip(cnt);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buf_compat() {
        let mut buffer = BinaryBuffer::with_capacity(4);
        buffer.write_i32(-2).unwrap();
        buffer.write_u16(0x1234).unwrap();
        buffer.write_f64(0.5).unwrap();
        buffer.set_position(0).unwrap();

        assert_eq!(Buf::remaining(&buffer), 14);
        assert_eq!(Buf::chunk(&buffer).len(), 14);

        assert_eq!(buffer.get_i32(), -2);
        assert_eq!(buffer.get_u16(), 0x1234);
        assert_eq!(buffer.position(), 6);

        Buf::advance(&mut buffer, 8);

        assert!(!buffer.has_remaining());
        assert!(Buf::chunk(&buffer).is_empty());
    }

    #[test]
    fn copy_to_bytes_consumes() {
        let mut buffer = BinaryBuffer::from_vec(b"head:body".to_vec());
        buffer.skip(5).unwrap();

        let bytes = buffer.copy_to_bytes(4);

        assert_eq!(&bytes[..], b"body");
        assert_eq!(BinaryBuffer::remaining(&buffer), 0);
    }

    #[test]
    fn closed_buffer_is_empty_buf() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3]);
        buffer.close();

        assert_eq!(Buf::remaining(&buffer), 0);
        assert!(Buf::chunk(&buffer).is_empty());

        Buf::advance(&mut buffer, 0);
    }

    #[test]
    #[should_panic]
    fn advance_past_end_panics() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3]);
        Buf::advance(&mut buffer, 4);
    }
}
