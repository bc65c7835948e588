//! # Error Types
//!
//! Custom error types for KISS Bridge using `thiserror`.
//!
//! The `Display` text of the protocol variants doubles as the diagnostic
//! message sent to the host inside a debug frame.

use thiserror::Error;

/// Main error type for KISS Bridge
#[derive(Debug, Error)]
pub enum KissError {
    /// Radio reported more bytes than a relay frame may carry
    #[error("error packet size {size} > {limit}")]
    OversizedOutboundPacket { size: usize, limit: usize },

    /// A working buffer would have been written past its capacity
    #[error("error packet size (buffer full at {capacity})")]
    BufferOverflow { capacity: usize },

    /// Escape byte followed by something other than TFEND/TFESC
    #[error("error escape {0:02x}")]
    InvalidEscape(u8),

    /// Data frame without the FlexNet bit (0x20) in its first byte
    #[error("error !0x20 ({0:02x})")]
    ProtocolFlagMissing(u8),

    /// FlexNet CRC over the frame does not match its trailer
    #[error("error crc {calculated:04x} != {received:04x}")]
    ChecksumMismatch { calculated: u16, received: u16 },

    /// Frame too short to strip its header/trailer
    #[error("error frame too short ({0} bytes)")]
    FrameTooShort(usize),

    /// Radio collaborator refused to reset
    #[error("Reset radio failed")]
    RadioResetFailed,

    /// Command nibble not understood
    #[error("frame type {0:02x} unk")]
    UnknownCommand(u8),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serial port errors
    #[error("Serial port error: {0}")]
    Serial(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KissError {
    /// Whether reporting this error latches the shared error indicator.
    ///
    /// Unknown commands are informational and a failed radio reset has its
    /// own flashing pattern, so neither latches.
    pub fn asserts_error_indicator(&self) -> bool {
        !matches!(self, KissError::UnknownCommand(_) | KissError::RadioResetFailed)
    }
}

/// Result type alias for KISS Bridge
pub type Result<T> = std::result::Result<T, KissError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_texts() {
        assert_eq!(KissError::UnknownCommand(0x03).to_string(), "frame type 03 unk");
        assert_eq!(KissError::RadioResetFailed.to_string(), "Reset radio failed");
        assert_eq!(
            KissError::ChecksumMismatch { calculated: 0xdad9, received: 0x0001 }.to_string(),
            "error crc dad9 != 0001"
        );
        assert_eq!(
            KissError::OversizedOutboundPacket { size: 600, limit: 508 }.to_string(),
            "error packet size 600 > 508"
        );
    }

    #[test]
    fn test_indicator_policy() {
        assert!(KissError::ChecksumMismatch { calculated: 0, received: 1 }.asserts_error_indicator());
        assert!(KissError::BufferOverflow { capacity: 10 }.asserts_error_indicator());
        assert!(KissError::InvalidEscape(0x00).asserts_error_indicator());
        assert!(KissError::ProtocolFlagMissing(0x00).asserts_error_indicator());
        assert!(KissError::FrameTooShort(2).asserts_error_indicator());
        assert!(KissError::OversizedOutboundPacket { size: 2, limit: 1 }.asserts_error_indicator());
        assert!(!KissError::UnknownCommand(0x05).asserts_error_indicator());
        assert!(!KissError::RadioResetFailed.asserts_error_indicator());
    }
}
