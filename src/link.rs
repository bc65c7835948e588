//! # Collaborator Traits
//!
//! The framer talks to the outside world only through these traits, so the
//! radio, the host link and the indicator lights can be swapped for
//! in-memory fakes in tests.

use async_trait::async_trait;
use std::io;

/// Packet radio side of the bridge
#[async_trait]
pub trait Radio: Send {
    /// Number of bytes of the pending radio packet, 0 if none
    fn peek(&mut self) -> io::Result<usize>;

    /// Read the pending packet into `buf`; returns how many bytes were written
    async fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Transmit one packet over the air
    async fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Reset the radio; `false` if it did not come back
    async fn reset(&mut self) -> bool;
}

/// Serial link to the host computer
#[async_trait]
pub trait HostLink: Send {
    /// Number of bytes waiting to be read
    fn peek(&mut self) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes, waiting for at least one
    async fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write `data` in full
    async fn send(&mut self, data: &[u8]) -> io::Result<()>;
}

/// A single on/off signal such as an LED
#[cfg_attr(test, mockall::automock)]
pub trait Indicator: Send {
    fn set(&mut self, on: bool);
}

/// The three optional indicators; `None` means not wired
#[derive(Default)]
pub struct Indicators {
    pub recv: Option<Box<dyn Indicator>>,
    pub send: Option<Box<dyn Indicator>>,
    pub error: Option<Box<dyn Indicator>>,
}

impl Indicators {
    /// No indicators at all
    pub fn none() -> Self {
        Self::default()
    }
}

/// Drive an optional indicator; a missing one is silently skipped
pub(crate) fn signal(indicator: &mut Option<Box<dyn Indicator>>, on: bool) {
    if let Some(indicator) = indicator {
        indicator.set(on);
    }
}
