//! # Framer
//!
//! Owns the working buffers and the collaborators, and moves frames in both
//! directions:
//!
//! - radio → host: raw radio packets are wrapped into FlexNet KISS frames
//! - host → radio: KISS frames are deframed, checked and dispatched
//! - diagnostics → host: status text wrapped in a canned AX.25 UI frame
//!
//! Every protocol error is reported to the host as a diagnostic frame and
//! costs only the frame it occurred in.

use std::io;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, trace, warn};

use crate::config::FramerConfig;
use crate::error::{KissError, Result};
use crate::kiss::buffer::FrameBuffer;
use crate::kiss::crc::crc_flex;
use crate::kiss::decoder::{DecodeStep, FrameDecoder};
use crate::kiss::encoder::{encode_data_frame, encode_diagnostic_frame};
use crate::kiss::protocol::*;
use crate::link::{signal, HostLink, Indicators, Radio};

/// On/off cycles of the error indicator after a failed radio reset
pub const RESET_FAILURE_FLASHES: usize = 3;

/// Duration of each half of a flash cycle
pub const FLASH_HALF_PERIOD: Duration = Duration::from_millis(100);

/// How a read of one inbound frame ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A whole frame of this many unescaped bytes is in the small buffer
    Complete(usize),
    /// The frame did not fit the small buffer
    Overflow,
    /// The deadline passed before the closing delimiter
    Timeout,
}

/// KISS framer between a radio and a host link
pub struct Framer<R, H> {
    radio: R,
    host: H,
    indicators: Indicators,
    /// Unescaped frame content
    small: FrameBuffer,
    /// Escaped on-wire frames
    big: FrameBuffer,
    decoder: FrameDecoder,
    max_packet_size: usize,
    parse_timeout: Duration,
}

impl<R: Radio, H: HostLink> Framer<R, H> {
    /// Create a framer; both working buffers are allocated here, once
    pub fn new(radio: R, host: H, indicators: Indicators, config: &FramerConfig) -> Self {
        let max_packet_size = config.max_packet_size;

        Self {
            radio,
            host,
            indicators,
            small: FrameBuffer::with_capacity(max_packet_size),
            big: FrameBuffer::with_capacity(2 * max_packet_size + FRAME_OVERHEAD),
            decoder: FrameDecoder::new(),
            max_packet_size,
            parse_timeout: Duration::from_millis(config.parse_timeout_ms),
        }
    }

    /// Announce the bridge to the host
    pub async fn begin(&mut self) {
        info!(
            "Framer ready (max packet {} bytes, parse timeout {:?})",
            self.max_packet_size, self.parse_timeout
        );
        self.debug("START").await;
    }

    /// One iteration of the polling loop: at most one radio packet and one
    /// host frame are handled.
    ///
    /// # Errors
    ///
    /// Returns [`KissError::Io`] if a collaborator fails. Protocol errors are
    /// reported to the host and never returned.
    pub async fn poll(&mut self) -> Result<()> {
        let radio_bytes = self.radio.peek()?;
        if radio_bytes > 0 {
            self.process_radio(radio_bytes).await?;
        }

        if self.host.peek()? > 0 {
            self.process_serial().await?;
        }

        Ok(())
    }

    /// Send `text` to the host as a diagnostic frame
    ///
    /// Never fails: text that would not fit is cut short and a failed send
    /// is only logged.
    pub async fn debug(&mut self, text: &str) {
        let limit = self.max_packet_size.saturating_sub(DIAGNOSTIC_HEADER.len());
        let text = truncate_at_char_boundary(text, limit);

        if let Err(e) = encode_diagnostic_frame(&mut self.big, text) {
            warn!("Failed to build diagnostic frame: {}", e);
            return;
        }

        if let Err(e) = self.host.send(&self.big).await {
            warn!("Failed to send diagnostic frame: {}", e);
        }
    }

    async fn process_radio(&mut self, n_bytes: usize) -> Result<()> {
        let limit = 2 * self.max_packet_size;
        if n_bytes > limit {
            self.report(KissError::OversizedOutboundPacket { size: n_bytes, limit }).await;
            return self.discard_radio_packet(n_bytes).await;
        }

        signal(&mut self.indicators.recv, true);
        let result = self.relay_radio_packet(n_bytes).await;
        signal(&mut self.indicators.recv, false);

        result
    }

    /// Pull `n_bytes` off the radio in buffer-sized chunks and drop them
    async fn discard_radio_packet(&mut self, n_bytes: usize) -> Result<()> {
        let mut remaining = n_bytes;
        while remaining > 0 {
            let slot = self.small.prepare(remaining);
            let received = self.radio.receive(slot).await?;
            if received == 0 {
                break;
            }
            remaining = remaining.saturating_sub(received);
        }

        self.small.clear();
        debug!("Discarded {} bytes of oversized radio packet", n_bytes - remaining);
        Ok(())
    }

    async fn relay_radio_packet(&mut self, n_bytes: usize) -> Result<()> {
        // Relays are not echoed to the host as "recv radio" diagnostics
        debug!("recv radio ({} bytes pending)", n_bytes);
        let slot = self.small.prepare(n_bytes);
        let received = self.radio.receive(slot).await?;
        self.small.truncate(received);

        if let Err(e) = encode_data_frame(&mut self.big, &self.small) {
            self.report(e).await;
            return Ok(());
        }

        debug!("Relaying radio packet ({} bytes, {} on the wire)", self.small.len(), self.big.len());
        self.host.send(&self.big).await?;
        Ok(())
    }

    async fn process_serial(&mut self) -> Result<()> {
        signal(&mut self.indicators.send, true);
        let result = self.receive_and_dispatch().await;
        signal(&mut self.indicators.send, false);

        result
    }

    async fn receive_and_dispatch(&mut self) -> Result<()> {
        match self.read_frame().await? {
            ParseOutcome::Complete(0) => trace!("Ignoring empty frame"),
            ParseOutcome::Complete(len) => self.dispatch(len).await?,
            ParseOutcome::Overflow => {
                let capacity = self.small.capacity();
                self.report(KissError::BufferOverflow { capacity }).await;
            }
            ParseOutcome::Timeout => {
                debug!("No complete frame from host within {:?}, discarding", self.parse_timeout);
            }
        }

        Ok(())
    }

    /// Read one frame from the host into the small buffer
    async fn read_frame(&mut self) -> Result<ParseOutcome> {
        let deadline = Instant::now() + self.parse_timeout;
        self.decoder.reset();
        self.small.clear();

        loop {
            let Some(byte) = self.read_byte(deadline).await? else {
                return Ok(ParseOutcome::Timeout);
            };

            match self.decoder.push(byte, &mut self.small) {
                Ok(DecodeStep::Pending) => {}
                Ok(DecodeStep::Complete) => return Ok(ParseOutcome::Complete(self.small.len())),
                Ok(DecodeStep::EscapeError(byte)) => self.report(KissError::InvalidEscape(byte)).await,
                Err(KissError::BufferOverflow { .. }) => return Ok(ParseOutcome::Overflow),
                Err(e) => return Err(e),
            }
        }
    }

    /// Next host byte, or `None` once `deadline` has passed
    async fn read_byte(&mut self, deadline: Instant) -> Result<Option<u8>> {
        if Instant::now() >= deadline {
            return Ok(None);
        }

        let mut byte = [0u8; 1];
        match timeout_at(deadline, self.host.receive(&mut byte)).await {
            Err(_) => Ok(None),
            Ok(Ok(0)) => Err(KissError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "host link closed",
            ))),
            Ok(Ok(_)) => Ok(Some(byte[0])),
            Ok(Err(e)) => Err(e.into()),
        }
    }

    async fn dispatch(&mut self, len: usize) -> Result<()> {
        let first = self.small[0];

        match Command::from_first_byte(first) {
            Command::Data if len >= 2 => self.dispatch_data(len).await,
            Command::Reset => {
                self.reset_radio().await;
                Ok(())
            }
            _ => {
                self.report(KissError::UnknownCommand(first)).await;
                Ok(())
            }
        }
    }

    async fn dispatch_data(&mut self, len: usize) -> Result<()> {
        let first = self.small[0];
        let mut valid = true;

        if first & FLEXNET_CRC_FLAG != 0 {
            let body = len - CRC_LEN;
            let calculated = crc_flex(&self.small[..body]);
            let received = u16::from_be_bytes([self.small[body], self.small[body + 1]]);

            if calculated != received {
                self.report(KissError::ChecksumMismatch { calculated, received }).await;
                valid = false;
            }
        } else {
            self.report(KissError::ProtocolFlagMissing(first)).await;
            valid = false;
        }

        // A non-zero first byte means control byte + CRC trailer, zero means
        // a bare command byte.
        let stripped = if first != 0 {
            len.checked_sub(1 + CRC_LEN)
        } else {
            // Flag is clear here, so this arm only feeds the length report
            len.checked_sub(1)
        };

        let Some(payload_len) = stripped else {
            self.report(KissError::FrameTooShort(len)).await;
            return Ok(());
        };

        if !valid {
            debug!("Dropping invalid data frame ({} bytes)", len);
            return Ok(());
        }

        if payload_len > 0 {
            debug!("Forwarding {} bytes to radio", payload_len);
            self.radio.send(&self.small[1..1 + payload_len]).await?;
        }

        Ok(())
    }

    async fn reset_radio(&mut self) {
        if self.radio.reset().await {
            info!("Radio reset");
            return;
        }

        self.report(KissError::RadioResetFailed).await;

        if self.indicators.error.is_none() {
            return;
        }

        for _ in 0..RESET_FAILURE_FLASHES {
            signal(&mut self.indicators.error, true);
            sleep(FLASH_HALF_PERIOD).await;
            signal(&mut self.indicators.error, false);
            sleep(FLASH_HALF_PERIOD).await;
        }
    }

    /// Log, tell the host and latch the error indicator if the kind calls for it
    async fn report(&mut self, error: KissError) {
        warn!("{}", error);
        self.debug(&error.to_string()).await;

        if error.asserts_error_indicator() {
            signal(&mut self.indicators.error, true);
        }
    }
}

fn truncate_at_char_boundary(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
