//! # KISS Protocol Constants
//!
//! Wire-level definitions for KISS framing carrying FlexNet/AX.25 payloads.

/// Frame delimiter (start and end of every frame)
pub const FEND: u8 = 0xC0;

/// Escape byte
pub const FESC: u8 = 0xDB;

/// Escaped FEND (follows FESC)
pub const TFEND: u8 = 0xDC;

/// Escaped FESC (follows FESC)
pub const TFESC: u8 = 0xDD;

/// FlexNet control byte leading every outbound data frame
pub const FLEXNET_CONTROL: u8 = 0x20;

/// Bit in the first byte of an inbound data frame announcing a CRC trailer
pub const FLEXNET_CRC_FLAG: u8 = 0x20;

/// Mask selecting the command nibble of the first frame byte
pub const COMMAND_MASK: u8 = 0x0F;

/// Command nibble: data frame
pub const CMD_DATA: u8 = 0x00;

/// Command nibble: reset the radio link
pub const CMD_RESET: u8 = 0x0F;

/// Length of the FlexNet CRC trailer
pub const CRC_LEN: usize = 2;

/// Seed of the CRC accumulator for every frame
pub const CRC_SEED: u16 = 0xFFFF;

/// Worst-case bytes a frame adds around its stuffed payload:
/// two delimiters, a stuffed control byte and a stuffed CRC trailer.
pub const FRAME_OVERHEAD: usize = 2 + 2 + 2 * CRC_LEN;

/// Shift an AX.25 address character into its on-air position.
const fn addr(c: u8) -> u8 {
    c << 1
}

/// Last byte of an AX.25 address: SSID `0`, end-of-address bit set.
const fn ssid_last(c: u8) -> u8 {
    (c << 1) | 1
}

/// Canned AX.25 header prefixed to diagnostic frames: `DEBUG-0` to `IDENT-0`,
/// UI frame, no layer 3.
pub const DIAGNOSTIC_HEADER: [u8; 16] = [
    addr(b'I'), addr(b'D'), addr(b'E'), addr(b'N'), addr(b'T'), addr(b' '), ssid_last(b'0'),
    addr(b'D'), addr(b'E'), addr(b'B'), addr(b'U'), addr(b'G'), addr(b' '), ssid_last(b'0'),
    0x03, // UI frame
    0xF0, // no layer 3
];

/// Command carried in the low nibble of the first byte of an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Payload for the radio
    Data,
    /// Reset the radio
    Reset,
    /// Anything else; carries the whole first byte for reporting
    Unknown(u8),
}

impl Command {
    /// Classify the first byte of a frame
    pub fn from_first_byte(byte: u8) -> Self {
        match byte & COMMAND_MASK {
            CMD_DATA => Command::Data,
            CMD_RESET => Command::Reset,
            _ => Command::Unknown(byte),
        }
    }
}
