// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! We separate out all the decoding methods for ease of maintenance.

use num_traits::FromBytes;

use crate::{BinaryBuffer, Error, Result, mutf8};

impl BinaryBuffer {
    /// Reads a number of type `T` in big-endian representation from the cursor.
    ///
    /// # Example
    ///
    /// ```
    /// use wirebuf::BinaryBuffer;
    ///
    /// let mut buffer = BinaryBuffer::from_vec(vec![0x12, 0x34, 0x56, 0x78]);
    ///
    /// assert_eq!(buffer.read_num_be::<u16>()?, 0x1234);
    /// assert_eq!(buffer.read_num_be::<u16>()?, 0x5678);
    /// assert_eq!(buffer.remaining(), 0);
    /// # Ok::<(), wirebuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than `size_of::<T>()` bytes remain and
    /// [`Error::Closed`] if the buffer has been closed. The cursor does not move on failure.
    pub fn read_num_be<T: FromBytes>(&mut self) -> Result<T>
    where
        T::Bytes: Default,
    {
        let mut bytes = <T::Bytes as Default>::default();
        self.read_fully(bytes.as_mut())?;
        Ok(T::from_be_bytes(&bytes))
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_num_be()
    }

    /// Reads a single signed byte.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_num_be()
    }

    /// Reads a one-byte boolean. Any non-zero byte is `true`.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|byte| byte != 0)
    }

    /// Reads a big-endian `i16`.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_num_be()
    }

    /// Reads a big-endian `u16`.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_num_be()
    }

    /// Reads a big-endian `i32`.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_num_be()
    }

    /// Reads a big-endian `i64`.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_num_be()
    }

    /// Reads an `f32` from its big-endian IEEE-754 bit pattern.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_num_be()
    }

    /// Reads an `f64` from its big-endian IEEE-754 bit pattern.
    ///
    /// # Errors
    ///
    /// See [`read_num_be()`][Self::read_num_be].
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_num_be()
    }

    /// Copies as many bytes as are available, up to `dst.len()`, from the cursor into `dst`.
    ///
    /// Returns the number of bytes copied, which is zero at the end of the data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the buffer has been closed.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let len = dst.len().min(self.remaining());
        self.read_with(len, |src| dst[..len].copy_from_slice(src))?;
        Ok(len)
    }

    /// Copies up to `length` bytes from the cursor into `dst`, starting at `offset`.
    ///
    /// Returns the number of bytes copied, which is less than `length` if the data runs out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the range does not lie within `dst` and
    /// [`Error::Closed`] if the buffer has been closed.
    pub fn read_range(&mut self, dst: &mut [u8], offset: usize, length: usize) -> Result<usize> {
        let end = offset.checked_add(length).unwrap_or(usize::MAX);
        let dst_len = dst.len();

        let range = dst.get_mut(offset..end).ok_or(Error::IndexOutOfBounds {
            index: end,
            len: dst_len,
        })?;

        self.read(range)
    }

    /// Fills `dst` completely with bytes from the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than `dst.len()` bytes remain, in which case
    /// nothing is copied and the cursor does not move. Returns [`Error::Closed`] if the buffer has
    /// been closed.
    pub fn read_fully(&mut self, dst: &mut [u8]) -> Result<()> {
        self.read_with(dst.len(), |src| dst.copy_from_slice(src))
    }

    /// Reads `count` UTF-16 code units written by [`write_chars16()`][Self::write_chars16].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than `2 * count` bytes remain and [`Error::Format`]
    /// if the code units contain an unpaired surrogate. The cursor does not move on failure.
    pub fn read_chars16(&mut self, count: usize) -> Result<String> {
        let len = count.checked_mul(2).ok_or(Error::Underflow {
            needed: usize::MAX,
            available: self.remaining(),
        })?;

        let position = self.position();

        let units: Vec<u16> = self.read_with(len, |src| {
            src.chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect()
        })?;

        String::from_utf16(&units).map_err(|e| {
            self.rewind_to(position);
            Error::Format(e.to_string())
        })
    }

    /// Reads a string written by [`write_utf()`][Self::write_utf]: a 2-byte big-endian payload
    /// length followed by the modified UTF-8 payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the length prefix or the payload it declares is not
    /// entirely present, and [`Error::Format`] if the payload is not valid modified UTF-8.
    /// Returns [`Error::Closed`] if the buffer has been closed. The cursor does not move on
    /// failure.
    pub fn read_utf(&mut self) -> Result<String> {
        let position = self.position();

        let result = self
            .read_u16()
            .and_then(|len| self.read_with(usize::from(len), mutf8::decode))
            .and_then(|decoded| decoded);

        if result.is_err() {
            self.rewind_to(position);
        }

        result
    }

    fn rewind_to(&mut self, position: usize) {
        debug_assert!(position <= self.position());

        // A position we previously stood at is always within bounds.
        _ = self.set_position(position);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_numbers() {
        let mut buffer = BinaryBuffer::from_vec(vec![
            0xAB, // u8
            0xFE, // i8
            0x12, 0x34, // i16
            0xFE, 0xDC, // u16
            0x12, 0x34, 0x56, 0x78, // i32
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, // i64
        ]);

        assert_eq!(buffer.read_u8().unwrap(), 0xAB);
        assert_eq!(buffer.read_i8().unwrap(), -2);
        assert_eq!(buffer.read_i16().unwrap(), 0x1234);
        assert_eq!(buffer.read_u16().unwrap(), 0xFEDC);
        assert_eq!(buffer.read_i32().unwrap(), 0x1234_5678);
        assert_eq!(buffer.read_i64().unwrap(), -2);
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn reads_float_bit_patterns() {
        let mut buffer = BinaryBuffer::from_vec(vec![
            0x3F, 0x80, 0x00, 0x00, // f32
            0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // f64
        ]);

        assert_eq!(buffer.read_f32().unwrap().to_bits(), 1.0_f32.to_bits());
        assert_eq!(buffer.read_f64().unwrap().to_bits(), (-2.0_f64).to_bits());
    }

    #[test]
    fn any_nonzero_byte_is_true() {
        let mut buffer = BinaryBuffer::from_vec(vec![0, 1, 0x80]);

        assert!(!buffer.read_bool().unwrap());
        assert!(buffer.read_bool().unwrap());
        assert!(buffer.read_bool().unwrap());
    }

    #[test]
    fn short_read_is_underflow() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3]);

        assert!(matches!(
            buffer.read_i32(),
            Err(Error::Underflow { needed: 4, available: 3 })
        ));
        assert_eq!(buffer.position(), 0);

        assert_eq!(buffer.read_i16().unwrap(), 0x0102);
        assert!(matches!(buffer.read_i16(), Err(Error::Underflow { needed: 2, available: 1 })));
    }

    #[test]
    fn read_clamps_to_remaining() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3]);
        let mut dst = [0_u8; 5];

        assert_eq!(buffer.read(&mut dst).unwrap(), 3);
        assert_eq!(dst, [1, 2, 3, 0, 0]);

        assert_eq!(buffer.read(&mut dst).unwrap(), 0);
    }

    #[test]
    fn read_range_places_bytes_at_offset() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3]);
        let mut dst = [0_u8; 5];

        assert_eq!(buffer.read_range(&mut dst, 1, 2).unwrap(), 2);
        assert_eq!(dst, [0, 1, 2, 0, 0]);

        assert_eq!(buffer.read_range(&mut dst, 4, 1).unwrap(), 1);
        assert_eq!(dst, [0, 1, 2, 0, 3]);
    }

    #[test]
    fn read_range_rejects_bad_ranges() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3]);
        let mut dst = [0_u8; 4];

        assert!(matches!(
            buffer.read_range(&mut dst, 3, 2),
            Err(Error::IndexOutOfBounds { index: 5, len: 4 })
        ));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn read_fully_requires_all_bytes() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3]);

        let mut dst = [0_u8; 4];
        assert!(matches!(
            buffer.read_fully(&mut dst),
            Err(Error::Underflow { needed: 4, available: 3 })
        ));
        assert_eq!(dst, [0; 4]);
        assert_eq!(buffer.position(), 0);

        let mut dst = [0_u8; 3];
        buffer.read_fully(&mut dst).unwrap();
        assert_eq!(dst, [1, 2, 3]);
    }

    #[test]
    fn chars16_round_trip() {
        let mut buffer = BinaryBuffer::new();
        buffer.write_chars16("Zß€😀").unwrap();
        buffer.set_position(0).unwrap();

        // The emoji is two code units.
        assert_eq!(buffer.read_chars16(5).unwrap(), "Zß€😀");
    }

    #[test]
    fn chars16_unpaired_surrogate_rewinds() {
        let mut buffer = BinaryBuffer::from_vec(vec![0xD8, 0x3D, 0x00, 0x41]);

        assert!(matches!(buffer.read_chars16(2), Err(Error::Format(_))));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn utf_reads_prefixed_payload() {
        let mut buffer = BinaryBuffer::from_vec(vec![0x00, 0x04, b'h', 0xC3, 0xA9, b'!', 0xFF]);

        assert_eq!(buffer.read_utf().unwrap(), "hé!");
        assert_eq!(buffer.remaining(), 1);
    }

    #[test]
    fn utf_truncated_payload_is_underflow() {
        let mut buffer = BinaryBuffer::from_vec(vec![0x00, 0x05, b'a', b'b']);

        assert!(matches!(
            buffer.read_utf(),
            Err(Error::Underflow { needed: 5, available: 2 })
        ));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn utf_missing_prefix_is_underflow() {
        let mut buffer = BinaryBuffer::from_vec(vec![0x00]);

        assert!(matches!(buffer.read_utf(), Err(Error::Underflow { needed: 2, available: 1 })));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn utf_sequence_cut_by_declared_length_is_format_error() {
        // The payload length says 1 byte, but 0xC3 starts a 2-byte sequence.
        let mut buffer = BinaryBuffer::from_vec(vec![0x00, 0x01, 0xC3, 0xA9]);

        assert!(matches!(buffer.read_utf(), Err(Error::Format(_))));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn utf_bad_continuation_is_format_error() {
        let mut buffer = BinaryBuffer::from_vec(vec![0x00, 0x02, 0xC3, 0x41]);

        assert!(matches!(buffer.read_utf(), Err(Error::Format(_))));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn reads_after_close_fail() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3, 4]);
        buffer.close();

        assert!(matches!(buffer.read_u8(), Err(Error::Closed)));
        assert!(matches!(buffer.read(&mut [0; 2]), Err(Error::Closed)));
        assert!(matches!(buffer.read_utf(), Err(Error::Closed)));
    }
}
