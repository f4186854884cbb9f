// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! We separate out the encoding functions for ease of maintenance.

use num_traits::ToBytes;

use crate::{BinaryBuffer, Error, Result, mutf8};

impl BinaryBuffer {
    /// Writes a number of type `T` in big-endian representation at the cursor.
    ///
    /// Floating-point numbers are written as the big-endian bytes of their IEEE-754 bit pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use wirebuf::BinaryBuffer;
    ///
    /// let mut buffer = BinaryBuffer::new();
    ///
    /// buffer.write_num_be(0xCAFE_u16)?;
    /// buffer.write_num_be(0xBABE_u16)?;
    ///
    /// buffer.set_position(0)?;
    /// assert_eq!(buffer.to_vec()?, [0xCA, 0xFE, 0xBA, 0xBE]);
    /// # Ok::<(), wirebuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the storage cannot grow enough and [`Error::Closed`] if the
    /// buffer has been closed.
    #[expect(clippy::needless_pass_by_value, reason = "tiny numeric types, fine to always pass by value")]
    pub fn write_num_be<T: ToBytes>(&mut self, value: T) -> Result<()> {
        let bytes = value.to_be_bytes();
        self.write_bytes(bytes.as_ref())
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_num_be(value)
    }

    /// Writes a single signed byte.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_num_be(value)
    }

    /// Writes a boolean as one byte: `1` for `true`, `0` for `false`.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Writes a big-endian `i16`.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_num_be(value)
    }

    /// Writes a big-endian `u16`, which is also how a single UTF-16 code unit is written.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_num_be(value)
    }

    /// Writes a big-endian `i32`.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_num_be(value)
    }

    /// Writes a big-endian `i64`.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_num_be(value)
    }

    /// Writes the big-endian IEEE-754 bit pattern of an `f32`.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_num_be(value)
    }

    /// Writes the big-endian IEEE-754 bit pattern of an `f64`.
    ///
    /// # Errors
    ///
    /// See [`write_num_be()`][Self::write_num_be].
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_num_be(value)
    }

    /// Copies a slice of bytes to the cursor. Writing an empty slice does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the storage cannot grow enough and [`Error::Closed`] if the
    /// buffer has been closed.
    pub fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        self.write_with(src.len(), |dst| dst.copy_from_slice(src))
    }

    /// Copies `length` bytes of `src`, starting at `offset`, to the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the range does not lie within `src`, otherwise
    /// fails like [`write_bytes()`][Self::write_bytes].
    pub fn write_bytes_range(&mut self, src: &[u8], offset: usize, length: usize) -> Result<()> {
        let end = offset.checked_add(length).unwrap_or(usize::MAX);

        let range = src.get(offset..end).ok_or(Error::IndexOutOfBounds {
            index: end,
            len: src.len(),
        })?;

        self.write_bytes(range)
    }

    /// Writes the low byte of every UTF-16 code unit of `value`.
    ///
    /// This is lossy for anything outside Latin-1 and is meant for dumping raw byte strings.
    /// Use [`write_utf()`][Self::write_utf] or [`write_chars16()`][Self::write_chars16] for data
    /// that must be read back.
    ///
    /// # Errors
    ///
    /// See [`write_bytes()`][Self::write_bytes].
    #[expect(clippy::cast_possible_truncation, reason = "truncation to the low byte is the point")]
    pub fn write_raw_chars(&mut self, value: &str) -> Result<()> {
        let len = value.encode_utf16().count();

        self.write_with(len, |dst| {
            for (byte, unit) in dst.iter_mut().zip(value.encode_utf16()) {
                *byte = unit as u8;
            }
        })
    }

    /// Writes every UTF-16 code unit of `value` as two big-endian bytes, with no length prefix.
    ///
    /// # Errors
    ///
    /// See [`write_bytes()`][Self::write_bytes].
    pub fn write_chars16(&mut self, value: &str) -> Result<()> {
        let len = value.encode_utf16().count().checked_mul(2).ok_or(Error::Overflow {
            position: self.position(),
            additional: usize::MAX,
        })?;

        self.write_with(len, |dst| {
            for (pair, unit) in dst.chunks_exact_mut(2).zip(value.encode_utf16()) {
                pair.copy_from_slice(&unit.to_be_bytes());
            }
        })
    }

    /// Writes `value` as a 2-byte big-endian payload length followed by its modified UTF-8
    /// encoding (see [`mutf8`]).
    ///
    /// # Example
    ///
    /// ```
    /// use wirebuf::BinaryBuffer;
    ///
    /// let mut buffer = BinaryBuffer::new();
    /// buffer.write_utf("né")?;
    ///
    /// buffer.set_position(0)?;
    /// assert_eq!(buffer.to_vec()?, [0x00, 0x03, b'n', 0xC3, 0xA9]);
    /// # Ok::<(), wirebuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] without writing anything if the payload is longer than
    /// [`mutf8::MAX_ENCODED_LEN`] bytes, otherwise fails like [`write_bytes()`][Self::write_bytes].
    pub fn write_utf(&mut self, value: &str) -> Result<()> {
        let len = mutf8::checked_encoded_len(value)?;
        let prefix = u16::try_from(len).map_err(|e| Error::Format(e.to_string()))?;

        self.write_with(2 + len, |dst| {
            let (prefix_dst, payload_dst) = dst.split_at_mut(2);
            prefix_dst.copy_from_slice(&prefix.to_be_bytes());
            mutf8::encode_into(value, payload_dst);
        })
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    fn written(buffer: &BinaryBuffer) -> Vec<u8> {
        let mut copy = buffer.clone();
        copy.set_position(0).unwrap();
        copy.to_vec().unwrap()
    }

    #[test]
    fn numbers_are_big_endian() {
        let mut buffer = BinaryBuffer::new();

        buffer.write_u8(0xAB).unwrap();
        buffer.write_i8(-2).unwrap();
        buffer.write_i16(0x1234).unwrap();
        buffer.write_u16(0xFEDC).unwrap();
        buffer.write_i32(0x1234_5678).unwrap();
        buffer.write_i64(-1).unwrap();

        assert_eq!(
            written(&buffer),
            [
                0xAB, // u8
                0xFE, // i8
                0x12, 0x34, // i16
                0xFE, 0xDC, // u16
                0x12, 0x34, 0x56, 0x78, // i32
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // i64
            ]
        );
    }

    #[test]
    fn floats_use_bit_patterns() {
        let mut buffer = BinaryBuffer::new();

        buffer.write_f32(1.0).unwrap();
        buffer.write_f64(-2.0).unwrap();

        assert_eq!(
            written(&buffer),
            [0x3F, 0x80, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn booleans_are_single_bytes() {
        let mut buffer = BinaryBuffer::new();

        buffer.write_bool(true).unwrap();
        buffer.write_bool(false).unwrap();

        assert_eq!(written(&buffer), [1, 0]);
    }

    #[test]
    fn write_bytes_range_copies_subrange() {
        let mut buffer = BinaryBuffer::new();

        buffer.write_bytes_range(b"0123456789", 2, 3).unwrap();
        buffer.write_bytes_range(b"0123456789", 10, 0).unwrap();

        assert_eq!(written(&buffer), b"234");
    }

    #[test]
    fn write_bytes_range_rejects_bad_ranges() {
        let mut buffer = BinaryBuffer::new();

        assert!(matches!(
            buffer.write_bytes_range(b"0123", 2, 3),
            Err(Error::IndexOutOfBounds { index: 5, len: 4 })
        ));
        assert!(matches!(
            buffer.write_bytes_range(b"0123", 5, 0),
            Err(Error::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            buffer.write_bytes_range(b"0123", 1, usize::MAX),
            Err(Error::IndexOutOfBounds { .. })
        ));

        assert_eq!(buffer.size(), 0);
    }

    #[test]
    fn empty_write_is_noop() {
        let mut buffer = BinaryBuffer::with_capacity(0);

        buffer.write_bytes(&[]).unwrap();

        assert_eq!(buffer.size(), 0);
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn raw_chars_keep_low_byte() {
        let mut buffer = BinaryBuffer::new();

        buffer.write_raw_chars("Aé€").unwrap();

        // U+20AC truncates to 0xAC.
        assert_eq!(written(&buffer), [0x41, 0xE9, 0xAC]);
    }

    #[test]
    fn chars16_are_big_endian_code_units() {
        let mut buffer = BinaryBuffer::new();

        buffer.write_chars16("A€").unwrap();

        assert_eq!(written(&buffer), [0x00, 0x41, 0x20, 0xAC]);
    }

    #[test]
    fn utf_has_byte_length_prefix() {
        let mut buffer = BinaryBuffer::new();

        buffer.write_utf("€").unwrap();

        assert_eq!(written(&buffer), [0x00, 0x03, 0xE2, 0x82, 0xAC]);
    }

    #[test]
    fn empty_utf_is_just_prefix() {
        let mut buffer = BinaryBuffer::new();

        buffer.write_utf("").unwrap();

        assert_eq!(written(&buffer), [0x00, 0x00]);
    }

    #[test]
    fn oversized_utf_writes_nothing() {
        let mut buffer = BinaryBuffer::new();
        buffer.write_u8(7).unwrap();

        let value = "€".repeat(mutf8::MAX_ENCODED_LEN / 3 + 1);
        assert!(matches!(buffer.write_utf(&value), Err(Error::Format(_))));

        assert_eq!(buffer.position(), 1);
        assert_eq!(buffer.size(), 1);
    }

    #[test]
    fn writes_after_close_fail() {
        let mut buffer = BinaryBuffer::new();
        buffer.close();

        assert!(matches!(buffer.write_i32(1), Err(Error::Closed)));
        assert!(matches!(buffer.write_bytes(&[]), Err(Error::Closed)));
        assert!(matches!(buffer.write_utf("x"), Err(Error::Closed)));
    }
}
