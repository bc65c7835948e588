//! # KISS Frame Decoder
//!
//! Byte-at-a-time state machine that reassembles one delimited frame from a
//! serial stream, undoing the byte stuffing as it goes.
//!
//! Bytes before the first FEND are noise and are skipped. The next FEND ends
//! the frame. The decoder never looks at a clock; the caller owns the deadline.

use super::buffer::FrameBuffer;
use super::protocol::*;
use crate::error::{KissError, Result};

/// Where the decoder is within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Skipping bytes until the opening FEND
    AwaitingFirstDelimiter,
    /// Inside a frame
    AwaitingData,
    /// Previous byte was FESC
    Escaped,
    /// Closing FEND seen; further input is ignored until [`FrameDecoder::reset`]
    Done,
}

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// Keep feeding bytes
    Pending,
    /// Closing delimiter seen; the frame is in the output buffer
    Complete,
    /// FESC followed by this byte; it was dropped and decoding continues
    EscapeError(u8),
}

/// Incremental KISS deframer
#[derive(Debug)]
pub struct FrameDecoder {
    state: DecoderState,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder waiting for the opening delimiter
    pub fn new() -> Self {
        Self {
            state: DecoderState::AwaitingFirstDelimiter,
        }
    }

    /// Current state
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Start over; the output buffer is not touched
    pub fn reset(&mut self) {
        self.state = DecoderState::AwaitingFirstDelimiter;
    }

    /// Feed one byte from the wire
    ///
    /// # Arguments
    ///
    /// * `byte` - Next byte of the stream
    /// * `out` - Receives unescaped frame content; cleared on the opening FEND
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::KissError::BufferOverflow`] if a data byte
    /// arrives while `out` is already full. The frame must then be abandoned.
    pub fn push(&mut self, byte: u8, out: &mut FrameBuffer) -> Result<DecodeStep> {
        match self.state {
            DecoderState::AwaitingFirstDelimiter => {
                if byte == FEND {
                    out.clear();
                    self.state = DecoderState::AwaitingData;
                }
                Ok(DecodeStep::Pending)
            }
            DecoderState::AwaitingData => match byte {
                FEND => {
                    self.state = DecoderState::Done;
                    Ok(DecodeStep::Complete)
                }
                FESC => {
                    self.state = DecoderState::Escaped;
                    Ok(DecodeStep::Pending)
                }
                _ => {
                    out.push(byte)?;
                    Ok(DecodeStep::Pending)
                }
            },
            DecoderState::Escaped => {
                if out.is_full() {
                    return Err(KissError::BufferOverflow { capacity: out.capacity() });
                }
                self.state = DecoderState::AwaitingData;
                match byte {
                    TFEND => out.push(FEND).map(|_| DecodeStep::Pending),
                    TFESC => out.push(FESC).map(|_| DecodeStep::Pending),
                    other => Ok(DecodeStep::EscapeError(other)),
                }
            }
            DecoderState::Done => Ok(DecodeStep::Complete),
        }
    }
}
