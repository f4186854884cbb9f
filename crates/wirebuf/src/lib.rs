// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Growable buffers for big-endian binary encoding and wraparound ring buffers.
//!
//! The crate offers three containers:
//!
//! * [`BinaryBuffer`] is a position-addressed byte store. It encodes and decodes big-endian
//!   primitives and length-prefixed modified UTF-8 strings at a movable cursor, growing its storage
//!   as writes demand.
//! * [`RingBuffer<T>`] is a growable FIFO of elements that evicts from the front without shifting
//!   retained elements.
//! * [`ByteRingBuffer`] is the same FIFO specialized to bytes, able to drain straight into a
//!   [`BinaryBuffer`], any [`std::io::Write`] or (with the `bytes-compat` feature) any
//!   `bytes::BufMut`.
//!
//! # Encoding and decoding
//!
//! Values are written at the cursor, which then moves past them. To decode what was written, move
//! the cursor back and read the values in the same order:
//!
//! ```
//! use wirebuf::BinaryBuffer;
//!
//! let mut buffer = BinaryBuffer::new();
//!
//! buffer.write_u8(3)?;
//! buffer.write_utf("temperature")?;
//! buffer.write_f32(21.5)?;
//! buffer.write_bool(true)?;
//!
//! buffer.set_position(0)?;
//!
//! assert_eq!(buffer.read_u8()?, 3);
//! assert_eq!(buffer.read_utf()?, "temperature");
//! assert_eq!(buffer.read_f32()?, 21.5);
//! assert!(buffer.read_bool()?);
//! # Ok::<(), wirebuf::Error>(())
//! ```
//!
//! All multi-byte numbers use big-endian byte order. Strings are stored as a 2-byte big-endian
//! length followed by their [modified UTF-8][mutf8] encoding.
//!
//! A read that needs more bytes than remain before the end of the data fails with
//! [`Error::Underflow`] and leaves the cursor where it was, so a partially received message can be
//! retried once more bytes arrive.
//!
//! # Buffering streams
//!
//! Ring buffers accept data in arbitrarily sized pieces and hand it out in the same order:
//!
//! ```
//! use wirebuf::{BinaryBuffer, ByteRingBuffer};
//!
//! let mut ring = ByteRingBuffer::with_capacity(4);
//!
//! ring.add_all(&[0x00, 0x00]);
//! ring.add_all(&[0x01, 0x02, 0xFF]);
//!
//! // Transfer a complete 4-byte frame and evict it.
//! let mut frame = BinaryBuffer::new();
//! let copied = ring.get_into_buffer(&mut frame, 4)?;
//! ring.remove(copied);
//!
//! frame.set_position(0)?;
//! assert_eq!(frame.read_i32()?, 0x0102);
//! assert_eq!(ring.len(), 1);
//! # Ok::<(), wirebuf::Error>(())
//! ```
//!
//! # Standard I/O
//!
//! [`BinaryBuffer::reader()`] and [`BinaryBuffer::writer()`] adapt a buffer to [`std::io::Read`],
//! [`std::io::BufRead`] and [`std::io::Write`]. [`ByteRingBuffer`] implements [`std::io::Read`]
//! (copy, then evict) and [`std::io::Write`] (append) directly.
//!
//! # Features
//!
//! * `bytes-compat`: implements `bytes::Buf` for [`BinaryBuffer`] and [`ByteRingBuffer`] and adds
//!   `ByteRingBuffer::get_into_buf_mut()`.
//!
//! # Thread safety
//!
//! All containers are `Send` and `Sync` (given thread-safe elements) and are used through `&mut`
//! for every mutation. Share them across threads behind your own synchronization.

mod binary_buffer;
mod binary_buffer_read;
mod binary_buffer_write;
mod byte_ring_buffer;
#[cfg(feature = "bytes-compat")]
mod bytes_compat;
mod error;
pub mod mutf8;
mod read_adapter;
mod ring;
mod ring_buffer;
mod write_adapter;

pub use binary_buffer::BinaryBuffer;
pub use byte_ring_buffer::ByteRingBuffer;
pub use error::{Error, Result};
pub use read_adapter::BinaryBufferReader;
pub use ring_buffer::RingBuffer;
pub use write_adapter::BinaryBufferWriter;

#[cfg(test)]
mod testing;
