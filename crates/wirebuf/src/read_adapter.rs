// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, BufRead, Read};

use crate::{BinaryBuffer, ByteRingBuffer};

/// Adapter that implements [`Read`] and [`BufRead`] for [`BinaryBuffer`].
///
/// Create an instance via [`BinaryBuffer::reader()`]. Reading consumes bytes from the cursor
/// onward, exactly like [`BinaryBuffer::read()`].
///
/// The buffer holds its data contiguously, so [`BufRead`] is implemented directly without an
/// intermediate buffer.
#[derive(Debug)]
pub struct BinaryBufferReader<'b> {
    inner: &'b mut BinaryBuffer,
}

impl<'b> BinaryBufferReader<'b> {
    #[must_use]
    pub(crate) const fn new(inner: &'b mut BinaryBuffer) -> Self {
        Self { inner }
    }
}

impl BinaryBuffer {
    /// Returns a [`Read`] + [`BufRead`] adapter that consumes bytes from the cursor onward.
    ///
    /// ```
    /// use std::io::BufRead;
    ///
    /// use wirebuf::BinaryBuffer;
    ///
    /// let mut buffer = BinaryBuffer::from_vec(b"first\nsecond\n".to_vec());
    ///
    /// let lines: Vec<String> = buffer.reader().lines().collect::<Result<_, _>>()?;
    /// assert_eq!(lines, ["first", "second"]);
    /// assert_eq!(buffer.remaining(), 0);
    /// # Ok::<(), std::io::Error>(())
    /// ```
    #[must_use]
    pub const fn reader(&mut self) -> BinaryBufferReader<'_> {
        BinaryBufferReader::new(self)
    }
}

impl Read for BinaryBufferReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(io::Error::from)
    }
}

impl BufRead for BinaryBufferReader<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.as_slice().map_err(io::Error::from)
    }

    fn consume(&mut self, amount: usize) {
        // Consuming past the end, or from a closed buffer, is a no-op beyond the available data.
        _ = self.inner.skip(amount.min(self.inner.remaining()));
    }
}

/// Reading from a ring copies bytes from the front and then evicts them.
impl Read for ByteRingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let copied = self.get(buf, 0, buf.len());
        self.remove(copied);
        Ok(copied)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        let mut buffer = BinaryBuffer::from_vec(b"Hello, world".to_vec());
        let mut reader = buffer.reader();

        let mut chunk = [0_u8; 5];

        assert_eq!(reader.read(&mut chunk).unwrap(), 5);
        assert_eq!(&chunk, b"Hello");

        assert_eq!(reader.read(&mut chunk).unwrap(), 5);
        assert_eq!(&chunk, b", wor");

        assert_eq!(reader.read(&mut chunk).unwrap(), 2);
        assert_eq!(&chunk[..2], b"ld");

        assert_eq!(reader.read(&mut chunk).unwrap(), 0);
    }

    #[test]
    fn read_starts_at_cursor() {
        let mut buffer = BinaryBuffer::from_vec(b"skip:data".to_vec());
        buffer.skip(5).unwrap();

        let mut contents = Vec::new();
        buffer.reader().read_to_end(&mut contents).unwrap();

        assert_eq!(contents, b"data");
        assert_eq!(buffer.position(), 9);
    }

    #[test]
    fn fill_buf_and_consume() {
        let mut buffer = BinaryBuffer::from_vec(b"Hello, world".to_vec());
        let mut reader = buffer.reader();

        assert_eq!(reader.fill_buf().unwrap(), b"Hello, world");
        assert_eq!(reader.fill_buf().unwrap(), b"Hello, world");

        reader.consume(7);
        assert_eq!(reader.fill_buf().unwrap(), b"world");

        reader.consume(100);
        assert!(reader.fill_buf().unwrap().is_empty());
    }

    #[test]
    fn closed_buffer_reports_io_error() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2, 3]);
        buffer.close();

        let mut reader = buffer.reader();

        let error = reader.read(&mut [0; 3]).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotConnected);

        let error = reader.fill_buf().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotConnected);

        reader.consume(1);
    }

    #[test]
    fn read_exact_past_end_is_unexpected_eof() {
        let mut buffer = BinaryBuffer::from_vec(vec![1, 2]);

        let error = buffer.reader().read_exact(&mut [0; 3]).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn ring_read_evicts() {
        let mut ring = ByteRingBuffer::with_capacity(4);
        ring.add_all(b"xxab");
        ring.remove(2);
        ring.add_all(b"cd");

        let mut chunk = [0_u8; 3];

        assert_eq!(ring.read(&mut chunk).unwrap(), 3);
        assert_eq!(&chunk, b"abc");
        assert_eq!(ring.len(), 1);

        assert_eq!(ring.read(&mut chunk).unwrap(), 1);
        assert_eq!(chunk[0], b'd');

        assert_eq!(ring.read(&mut chunk).unwrap(), 0);
        assert_eq!(ring.read(&mut []).unwrap(), 0);
    }
}
