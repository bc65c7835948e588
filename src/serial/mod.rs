//! # Serial Communication Module
//!
//! Real collaborators over `tokio-serial`:
//!
//! - [`SerialLink`]: the host side, implementing [`HostLink`]
//! - [`SerialRadio`]: a radio modem on a serial port, implementing [`Radio`]
//!
//! Both ports are opened 8N1 without flow control.

use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{ClearBuffer, SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

use crate::error::{KissError, Result};
use crate::link::{HostLink, Radio};

/// How long DTR is held low to reset the radio modem
pub const RESET_PULSE: Duration = Duration::from_millis(100);

/// Serial port handle shared by both sides of the bridge
pub struct SerialLink {
    /// Serial port handle
    port: SerialStream,
    /// Device path (e.g., /dev/ttyACM0)
    device_path: String,
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl SerialLink {
    /// Open a serial port
    ///
    /// # Errors
    ///
    /// Returns [`KissError::Serial`] if the port cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kiss_bridge::serial::SerialLink;
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() -> anyhow::Result<()> {
    ///     let host = SerialLink::open("/dev/ttyACM0", 115200)?;
    ///     println!("Connected to: {}", host.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        debug!("Opening serial port {} at {} baud", path, baud_rate);
        let port = Self::open_port(path, baud_rate)?;
        info!("Opened serial port {} at {} baud", path, baud_rate);

        Ok(Self {
            port,
            device_path: path.to_string(),
        })
    }

    fn open_port(path: &str, baud_rate: u32) -> Result<SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| KissError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Path of the opened device
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    fn bytes_waiting(&self) -> io::Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    async fn write_frame(&mut self, data: &[u8]) -> io::Result<()> {
        // SerialStream also implements the blocking io traits
        AsyncWriteExt::write_all(&mut self.port, data).await?;
        AsyncWriteExt::flush(&mut self.port).await
    }
}

#[async_trait]
impl HostLink for SerialLink {
    fn peek(&mut self) -> io::Result<usize> {
        self.bytes_waiting()
    }

    async fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        AsyncReadExt::read(&mut self.port, buf).await
    }

    async fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_frame(data).await
    }
}

/// Radio modem attached to a serial port
///
/// Whatever bytes are waiting on the port count as the pending packet.
#[derive(Debug)]
pub struct SerialRadio {
    link: SerialLink,
}

impl SerialRadio {
    /// Open the radio modem's serial port
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        Ok(Self {
            link: SerialLink::open(path, baud_rate)?,
        })
    }

    /// Path of the opened device
    pub fn device_path(&self) -> &str {
        self.link.device_path()
    }

    /// Drop DTR, wait, raise it again and flush both directions
    async fn pulse_dtr(&mut self) -> tokio_serial::Result<()> {
        let port = &mut self.link.port;
        port.write_data_terminal_ready(false)?;
        tokio::time::sleep(RESET_PULSE).await;
        port.write_data_terminal_ready(true)?;
        port.clear(ClearBuffer::All)
    }
}

#[async_trait]
impl Radio for SerialRadio {
    fn peek(&mut self) -> io::Result<usize> {
        self.link.bytes_waiting()
    }

    async fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        AsyncReadExt::read(&mut self.link.port, buf).await
    }

    async fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.link.write_frame(data).await
    }

    async fn reset(&mut self) -> bool {
        match self.pulse_dtr().await {
            Ok(()) => {
                info!("Radio modem on {} reset", self.link.device_path);
                true
            }
            Err(e) => {
                warn!("Failed to reset radio modem on {}: {}", self.link.device_path, e);
                false
            }
        }
    }
}
