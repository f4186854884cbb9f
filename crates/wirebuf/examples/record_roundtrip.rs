// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Encoding records into a `BinaryBuffer`, streaming them through a `ByteRingBuffer` in uneven
//! pieces and decoding them on the other side.
//!
//! 1. We encode each record as a length-prefixed frame.
//! 2. The frames are fed into a ring buffer a few bytes at a time, as a network socket might.
//! 3. Whenever a complete frame is buffered, we move it out of the ring and decode it.

use wirebuf::{BinaryBuffer, ByteRingBuffer};

#[derive(Debug, PartialEq)]
struct Reading {
    sensor: String,
    sequence: i64,
    celsius: f32,
    healthy: bool,
}

fn main() -> wirebuf::Result<()> {
    let readings = vec![
        Reading {
            sensor: "boiler-room".to_string(),
            sequence: 1,
            celsius: 71.5,
            healthy: true,
        },
        Reading {
            sensor: "außen-nord".to_string(),
            sequence: 2,
            celsius: -4.25,
            healthy: true,
        },
        Reading {
            sensor: "冷蔵庫".to_string(),
            sequence: 3,
            celsius: 3.0,
            healthy: false,
        },
    ];

    let mut wire = BinaryBuffer::new();
    for reading in &readings {
        encode_frame(&mut wire, reading)?;
    }

    wire.set_position(0)?;
    let wire = wire.to_vec()?;
    println!("Encoded {} readings into {} bytes.", readings.len(), wire.len());

    let mut ring = ByteRingBuffer::with_capacity(8);
    let mut received = Vec::new();

    // Deliver the bytes in small pieces and decode frames as soon as they are complete.
    for piece in wire.chunks(5) {
        ring.add_all(piece);

        while let Some(reading) = try_decode_frame(&mut ring)? {
            println!("Received {reading:?}");
            received.push(reading);
        }
    }

    assert_eq!(received, readings);
    println!("Ring buffer grew to {} bytes while buffering partial frames.", ring.capacity());

    Ok(())
}

/// Writes a 4-byte body length followed by the body.
fn encode_frame(wire: &mut BinaryBuffer, reading: &Reading) -> wirebuf::Result<()> {
    let length_at = wire.position();
    wire.write_i32(0)?;

    wire.write_utf(&reading.sensor)?;
    wire.write_i64(reading.sequence)?;
    wire.write_f32(reading.celsius)?;
    wire.write_bool(reading.healthy)?;

    let end = wire.position();
    let body_len = i32::try_from(end - length_at - 4).map_err(|e| wirebuf::Error::Format(e.to_string()))?;

    // Patch the length now that the body size is known.
    wire.set_position(length_at)?;
    wire.write_i32(body_len)?;
    wire.set_position(end)
}

/// Decodes one frame if the ring holds all of it, evicting the frame's bytes.
fn try_decode_frame(ring: &mut ByteRingBuffer) -> wirebuf::Result<Option<Reading>> {
    let mut header = [0_u8; 4];
    if ring.get(&mut header, 0, 4) < 4 {
        return Ok(None);
    }

    let body_len = usize::try_from(i32::from_be_bytes(header)).map_err(|e| wirebuf::Error::Format(e.to_string()))?;
    let frame_len = 4 + body_len;

    if ring.len() < frame_len {
        return Ok(None);
    }

    let mut frame = BinaryBuffer::with_capacity(frame_len);
    ring.get_into_buffer(&mut frame, frame_len)?;
    ring.remove(frame_len);

    frame.set_position(4)?;

    Ok(Some(Reading {
        sensor: frame.read_utf()?,
        sequence: frame.read_i64()?,
        celsius: frame.read_f32()?,
        healthy: frame.read_bool()?,
    }))
}
