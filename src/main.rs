//! # KISS Bridge
//!
//! Bridge a packet-radio modem and a host computer over KISS framing.
//!
//! The application opens both serial ports and runs a cooperative polling
//! loop: each tick relays at most one radio packet to the host and handles at
//! most one KISS frame from the host.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use kiss_bridge::config::{Config, LoggingConfig};
use kiss_bridge::framer::Framer;
use kiss_bridge::indicator;
use kiss_bridge::serial::{SerialLink, SerialRadio};

/// Configuration file used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for KISS Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, or `config/default.toml`)
///    - Set up logging with tracing subscriber
///    - Open the radio and host serial ports
///    - Send the `START` diagnostic frame to the host
///
/// 2. **Main Loop**
///    - Poll both directions once per tick
///    - Log collaborator I/O errors and keep going
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if the configuration is invalid or a serial port cannot be
/// opened.
///
/// # Examples
///
/// ```bash
/// cargo run --release -- /etc/kiss-bridge.toml
/// ```
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let _log_guard = init_logging(&config.logging);

    info!("KISS Bridge v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", config_path.display());

    let radio = SerialRadio::open(&config.radio.port, config.radio.baud_rate)?;
    info!("Radio modem opened at: {}", radio.device_path());

    let host = SerialLink::open(&config.host.port, config.host.baud_rate)?;
    info!("Host link opened at: {}", host.device_path());

    let indicators = indicator::from_config(&config.indicators);
    let mut framer = Framer::new(radio, host, indicators, &config.framer);
    framer.begin().await;

    let mut poll_interval = interval(Duration::from_millis(config.framer.poll_interval_ms));
    poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Bridging (poll every {}ms)", config.framer.poll_interval_ms);
    info!("Press Ctrl+C to exit");

    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                if let Err(e) = framer.poll().await {
                    warn!("Poll failed: {}", e);
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    Ok(())
}

/// Log to stdout, or to a daily rolling file when `log_dir` is set
///
/// The returned guard flushes the file writer on drop and must be kept alive.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "kiss-bridge.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}
