// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Modified UTF-8 codec.
//!
//! Modified UTF-8 encodes each UTF-16 code unit of a string separately, using one, two or three
//! bytes per code unit:
//!
//! | Code unit                  | Bytes                                                         |
//! |----------------------------|---------------------------------------------------------------|
//! | `0x0001..=0x007F`          | `0xxxxxxx`                                                    |
//! | `0x0000`, `0x0080..=0x07FF`| `110xxxxx 10xxxxxx`                                           |
//! | `0x0800..=0xFFFF`          | `1110xxxx 10xxxxxx 10xxxxxx`                                  |
//!
//! Two differences from standard UTF-8 follow from this: the NUL character is never encoded as a
//! zero byte, and a supplementary character is encoded as its two surrogate code units (six bytes)
//! instead of one four-byte sequence.
//!
//! The functions here deal with the payload only. The 2-byte length prefix that precedes the
//! payload on the wire is written and read by [`BinaryBuffer`][crate::BinaryBuffer].
//!
//! ```
//! let payload = wirebuf::mutf8::encode("a\0€").unwrap();
//! assert_eq!(payload, [0x61, 0xC0, 0x80, 0xE2, 0x82, 0xAC]);
//!
//! assert_eq!(wirebuf::mutf8::decode(&payload).unwrap(), "a\0€");
//! ```

use crate::{Error, Result};

/// The largest payload that fits behind the 2-byte length prefix.
pub const MAX_ENCODED_LEN: usize = u16::MAX as usize;

/// Returns the number of bytes `value` occupies once encoded, excluding the length prefix.
///
/// The result is not limited to [`MAX_ENCODED_LEN`]; callers compare against it to decide
/// whether the string can be encoded at all.
#[must_use]
pub fn encoded_len(value: &str) -> usize {
    value.encode_utf16().map(unit_len).sum()
}

const fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        _ => 3,
    }
}

/// Encodes `value` into a new modified UTF-8 payload.
///
/// # Errors
///
/// Returns [`Error::Format`] if the payload would be longer than [`MAX_ENCODED_LEN`] bytes.
pub fn encode(value: &str) -> Result<Vec<u8>> {
    let len = checked_encoded_len(value)?;

    let mut payload = vec![0; len];
    encode_into(value, &mut payload);
    Ok(payload)
}

/// Returns the encoded length of `value` after verifying it fits behind the length prefix.
pub(crate) fn checked_encoded_len(value: &str) -> Result<usize> {
    let len = encoded_len(value);

    if len > MAX_ENCODED_LEN {
        return Err(Error::Format(format!(
            "encoded string is {len} bytes long, the limit is {MAX_ENCODED_LEN}"
        )));
    }

    Ok(len)
}

/// Encodes `value` into `dst`, which must be exactly `encoded_len(value)` bytes long.
#[expect(
    clippy::cast_possible_truncation,
    reason = "every cast is of a value already masked or shifted into the u8 range"
)]
pub(crate) fn encode_into(value: &str, dst: &mut [u8]) {
    debug_assert_eq!(dst.len(), encoded_len(value));

    let mut cursor = 0;

    for unit in value.encode_utf16() {
        match unit {
            0x0001..=0x007F => {
                dst[cursor] = unit as u8;
                cursor += 1;
            }
            0x0000 | 0x0080..=0x07FF => {
                dst[cursor] = 0xC0 | (unit >> 6) as u8;
                dst[cursor + 1] = 0x80 | (unit & 0x3F) as u8;
                cursor += 2;
            }
            _ => {
                dst[cursor] = 0xE0 | (unit >> 12) as u8;
                dst[cursor + 1] = 0x80 | ((unit >> 6) & 0x3F) as u8;
                dst[cursor + 2] = 0x80 | (unit & 0x3F) as u8;
                cursor += 3;
            }
        }
    }
}

/// Decodes a modified UTF-8 payload (without its length prefix) into a string.
///
/// Surrogate pairs encoded as two three-byte sequences are recombined into the supplementary
/// character they represent.
///
/// # Errors
///
/// Returns [`Error::Format`] if a lead byte is not a valid sequence start, a continuation byte
/// does not match `10xxxxxx`, a sequence is cut short by the end of the payload, or the decoded
/// code units contain an unpaired surrogate.
pub fn decode(payload: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(payload.len());
    let mut offset = 0;

    while let Some(&lead) = payload.get(offset) {
        match lead >> 4 {
            0x0..=0x7 => {
                units.push(u16::from(lead));
                offset += 1;
            }
            0xC | 0xD => {
                let second = continuation(payload, offset, 1)?;
                units.push((u16::from(lead & 0x1F) << 6) | u16::from(second & 0x3F));
                offset += 2;
            }
            0xE => {
                let second = continuation(payload, offset, 1)?;
                let third = continuation(payload, offset, 2)?;
                units.push((u16::from(lead & 0x0F) << 12) | (u16::from(second & 0x3F) << 6) | u16::from(third & 0x3F));
                offset += 3;
            }
            _ => {
                return Err(Error::Format(format!("invalid lead byte {lead:#04x} at offset {offset}")));
            }
        }
    }

    String::from_utf16(&units).map_err(|e| Error::Format(e.to_string()))
}

/// Fetches the continuation byte `index` positions after the lead byte at `lead_offset`.
fn continuation(payload: &[u8], lead_offset: usize, index: usize) -> Result<u8> {
    let offset = lead_offset + index;

    let Some(&byte) = payload.get(offset) else {
        return Err(Error::Format(format!(
            "sequence starting at offset {lead_offset} is truncated by the end of the payload"
        )));
    };

    if byte & 0xC0 != 0x80 {
        return Err(Error::Format(format!("invalid continuation byte {byte:#04x} at offset {offset}")));
    }

    Ok(byte)
}
