// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, Write};

use crate::{BinaryBuffer, ByteRingBuffer};

/// Adapter that implements [`Write`] for [`BinaryBuffer`].
///
/// Create an instance via [`BinaryBuffer::writer()`]. Every write lands at the cursor, exactly like
/// [`BinaryBuffer::write_bytes()`], and is always accepted in full unless the storage cannot grow.
#[derive(Debug)]
pub struct BinaryBufferWriter<'b> {
    inner: &'b mut BinaryBuffer,
}

impl<'b> BinaryBufferWriter<'b> {
    #[must_use]
    pub(crate) const fn new(inner: &'b mut BinaryBuffer) -> Self {
        Self { inner }
    }
}

impl BinaryBuffer {
    /// Returns a [`Write`] adapter that writes bytes at the cursor.
    ///
    /// ```
    /// use std::io::Write;
    ///
    /// use wirebuf::BinaryBuffer;
    ///
    /// let mut buffer = BinaryBuffer::new();
    /// write!(buffer.writer(), "{}-{}", 4, 2)?;
    ///
    /// buffer.set_position(0)?;
    /// assert_eq!(buffer.to_vec()?, b"4-2");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub const fn writer(&mut self) -> BinaryBufferWriter<'_> {
        BinaryBufferWriter::new(self)
    }
}

impl Write for BinaryBufferWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_bytes(buf)?;
        Ok(buf.len())
    }

    #[cfg_attr(test, mutants::skip)] // Nothing to flush.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writing to a ring appends the bytes at the back, growing the ring as needed.
impl Write for ByteRingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.add_all(buf))
    }

    #[cfg_attr(test, mutants::skip)] // Nothing to flush.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
