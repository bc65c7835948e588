//! # KISS Frame Encoder
//!
//! Byte stuffing and assembly of outbound FlexNet frames:
//!
//! ```text
//! FEND | 0x20 | stuffed(payload...) | stuffed(crc_hi) | stuffed(crc_lo) | FEND
//! ```
//!
//! The CRC covers the control byte and the unescaped payload, in stream order.

use super::buffer::FrameBuffer;
use super::crc::update_crc_flex;
use super::protocol::*;
use crate::error::Result;

/// Append `value` to `out`, escaping FEND and FESC
///
/// Writes one byte, or two for an escaped value. An escape pair is written
/// whole or not at all.
pub fn stuff_byte(out: &mut FrameBuffer, value: u8) -> Result<()> {
    match value {
        FEND => out.extend_from_slice(&[FESC, TFEND]),
        FESC => out.extend_from_slice(&[FESC, TFESC]),
        _ => out.push(value),
    }
}

/// Build a relay frame for bytes received from the radio
///
/// # Arguments
///
/// * `out` - Destination; cleared first
/// * `payload` - Raw bytes as delivered by the radio
///
/// # Errors
///
/// Returns [`crate::error::KissError::BufferOverflow`] if `out` cannot hold
/// the stuffed frame. Size `out` at `2 * payload + FRAME_OVERHEAD` to rule
/// this out.
///
/// # Examples
///
/// ```
/// use kiss_bridge::kiss::buffer::FrameBuffer;
/// use kiss_bridge::kiss::encoder::encode_data_frame;
///
/// let mut out = FrameBuffer::with_capacity(32);
/// encode_data_frame(&mut out, b"HI").unwrap();
/// assert_eq!(&out[..], &[0xC0, 0x20, b'H', b'I', 0xDA, 0xD9, 0xC0]);
/// ```
pub fn encode_data_frame(out: &mut FrameBuffer, payload: &[u8]) -> Result<()> {
    encode_flexnet_frame(out, &[payload])
}

/// Build a diagnostic frame carrying `text` behind the canned AX.25 header
///
/// The host sees it as a UI frame from `DEBUG-0` to `IDENT-0`.
pub fn encode_diagnostic_frame(out: &mut FrameBuffer, text: &str) -> Result<()> {
    encode_flexnet_frame(out, &[&DIAGNOSTIC_HEADER[..], text.as_bytes()])
}

fn encode_flexnet_frame(out: &mut FrameBuffer, parts: &[&[u8]]) -> Result<()> {
    let mut crc = CRC_SEED;

    out.clear();
    out.push(FEND)?;

    update_crc_flex(&[FLEXNET_CONTROL], &mut crc);
    stuff_byte(out, FLEXNET_CONTROL)?;

    for part in parts {
        update_crc_flex(part, &mut crc);
        for &byte in *part {
            stuff_byte(out, byte)?;
        }
    }

    let [crc_hi, crc_lo] = crc.to_be_bytes();
    stuff_byte(out, crc_hi)?;
    stuff_byte(out, crc_lo)?;

    out.push(FEND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KissError;
    use crate::kiss::crc::crc_flex;

    #[test]
    fn test_stuff_plain_byte() {
        let mut out = FrameBuffer::with_capacity(4);
        stuff_byte(&mut out, 0x41).unwrap();
        assert_eq!(&out[..], &[0x41]);
    }

    #[test]
    fn test_stuff_special_bytes() {
        let mut out = FrameBuffer::with_capacity(8);
        stuff_byte(&mut out, FEND).unwrap();
        stuff_byte(&mut out, FESC).unwrap();
        stuff_byte(&mut out, TFEND).unwrap();
        stuff_byte(&mut out, TFESC).unwrap();
        assert_eq!(&out[..], &[FESC, TFEND, FESC, TFESC, TFEND, TFESC]);
    }

    #[test]
    fn test_stuff_escape_pair_needs_two_slots() {
        let mut out = FrameBuffer::with_capacity(2);
        out.push(0x00).unwrap();

        let result = stuff_byte(&mut out, FEND);
        assert!(matches!(result, Err(KissError::BufferOverflow { .. })));
        assert_eq!(&out[..], &[0x00]);
    }

    #[test]
    fn test_encode_data_frame_layout() {
        let mut out = FrameBuffer::with_capacity(32);
        encode_data_frame(&mut out, b"HI").unwrap();
        assert_eq!(&out[..], &[FEND, 0x20, b'H', b'I', 0xDA, 0xD9, FEND]);
    }

    #[test]
    fn test_encode_data_frame_stuffs_payload_not_crc_input() {
        let mut out = FrameBuffer::with_capacity(32);
        encode_data_frame(&mut out, &[FEND, FESC]).unwrap();

        // CRC is over the raw bytes
        assert_eq!(crc_flex(&[0x20, FEND, FESC]), 0xA10A);
        assert_eq!(
            &out[..],
            &[FEND, 0x20, FESC, TFEND, FESC, TFESC, 0xA1, 0x0A, FEND]
        );
    }

    #[test]
    fn test_encode_data_frame_stuffs_crc_trailer() {
        let mut out = FrameBuffer::with_capacity(32);
        encode_data_frame(&mut out, &[0xDD]).unwrap();

        // crc = 0xC01C, high byte collides with FEND
        assert_eq!(&out[..], &[FEND, 0x20, 0xDD, FESC, TFEND, 0x1C, FEND]);
    }

    #[test]
    fn test_encode_empty_payload() {
        let mut out = FrameBuffer::with_capacity(8);
        encode_data_frame(&mut out, &[]).unwrap();
        assert_eq!(&out[..], &[FEND, 0x20, 0xDE, 0xFD, FEND]);
    }

    #[test]
    fn test_encode_worst_case_fits_sized_buffer() {
        let payload = [FEND; 100];
        let mut out = FrameBuffer::with_capacity(2 * payload.len() + FRAME_OVERHEAD);
        encode_data_frame(&mut out, &payload).unwrap();
        assert_eq!(out[0], FEND);
        assert_eq!(out[out.len() - 1], FEND);
        assert!(out.len() <= out.capacity());
    }

    #[test]
    fn test_encode_overflow_is_an_error() {
        let mut out = FrameBuffer::with_capacity(6);
        let result = encode_data_frame(&mut out, b"TOO LONG");
        assert!(matches!(result, Err(KissError::BufferOverflow { capacity: 6 })));
    }

    #[test]
    fn test_encode_reuses_buffer() {
        let mut out = FrameBuffer::with_capacity(32);
        encode_data_frame(&mut out, b"FIRST FRAME").unwrap();
        encode_data_frame(&mut out, b"HI").unwrap();
        assert_eq!(&out[..], &[FEND, 0x20, b'H', b'I', 0xDA, 0xD9, FEND]);
    }

    #[test]
    fn test_encode_diagnostic_frame() {
        let mut out = FrameBuffer::with_capacity(64);
        encode_diagnostic_frame(&mut out, "START").unwrap();

        let mut expected = vec![FEND, 0x20];
        expected.extend_from_slice(&DIAGNOSTIC_HEADER);
        expected.extend_from_slice(b"START");
        expected.extend_from_slice(&[0x9A, 0x87, FEND]);
        assert_eq!(&out[..], &expected[..]);
    }
}
