//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KissError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub radio: RadioConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub framer: FramerConfig,

    #[serde(default)]
    pub indicators: IndicatorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial port of the radio modem
#[derive(Debug, Deserialize, Clone)]
pub struct RadioConfig {
    #[serde(default = "default_radio_port")]
    pub port: String,

    #[serde(default = "default_radio_baud_rate")]
    pub baud_rate: u32,
}

/// Serial link to the host computer
#[derive(Debug, Deserialize, Clone)]
pub struct HostConfig {
    #[serde(default = "default_host_port")]
    pub port: String,

    #[serde(default = "default_host_baud_rate")]
    pub baud_rate: u32,
}

/// Framing configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FramerConfig {
    /// Largest unescaped frame accepted from the host
    #[serde(default = "default_max_packet_size")]
    pub max_packet_size: usize,

    /// How long to wait for a complete frame once host input starts
    #[serde(default = "default_parse_timeout_ms")]
    pub parse_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Indicator lights; each is the path of a sysfs brightness/value file
#[derive(Debug, Deserialize, Clone, Default)]
pub struct IndicatorConfig {
    #[serde(default)]
    pub recv_led: Option<PathBuf>,

    #[serde(default)]
    pub send_led: Option<PathBuf>,

    #[serde(default)]
    pub error_led: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Write daily rolling log files here instead of stdout
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

// Default value functions
fn default_radio_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_radio_baud_rate() -> u32 { 9600 }
fn default_host_port() -> String { "/dev/ttyACM0".to_string() }
fn default_host_baud_rate() -> u32 { 115200 }

fn default_max_packet_size() -> usize { 254 }
fn default_parse_timeout_ms() -> u64 { 2000 }
fn default_poll_interval_ms() -> u64 { 1 }

impl Default for Config {
    fn default() -> Self {
        Self {
            radio: RadioConfig::default(),
            host: HostConfig::default(),
            framer: FramerConfig::default(),
            indicators: IndicatorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            port: default_radio_port(),
            baud_rate: default_radio_baud_rate(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: default_host_port(),
            baud_rate: default_host_baud_rate(),
        }
    }
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_packet_size: default_max_packet_size(),
            parse_timeout_ms: default_parse_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kiss_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        let ports = [
            ("radio", &self.radio.port, self.radio.baud_rate),
            ("host", &self.host.port, self.host.baud_rate),
        ];
        for (name, port, baud_rate) in ports {
            if port.is_empty() {
                return Err(KissError::Config(
                    toml::de::Error::custom(format!("{} port cannot be empty", name))
                ));
            }

            if baud_rate == 0 {
                return Err(KissError::Config(
                    toml::de::Error::custom(format!("{} baud_rate must be greater than 0", name))
                ));
            }
        }

        if self.radio.port == self.host.port {
            return Err(KissError::Config(
                toml::de::Error::custom("radio and host must use different ports")
            ));
        }

        // Buffers must at least hold the diagnostic header
        if self.framer.max_packet_size < 16 || self.framer.max_packet_size > 4096 {
            return Err(KissError::Config(
                toml::de::Error::custom("max_packet_size must be between 16 and 4096")
            ));
        }

        if self.framer.parse_timeout_ms == 0 || self.framer.parse_timeout_ms > 60000 {
            return Err(KissError::Config(
                toml::de::Error::custom("parse_timeout_ms must be between 1 and 60000")
            ));
        }

        if self.framer.poll_interval_ms == 0 || self.framer.poll_interval_ms > 1000 {
            return Err(KissError::Config(
                toml::de::Error::custom("poll_interval_ms must be between 1 and 1000")
            ));
        }

        for (name, led) in [
            ("recv_led", &self.indicators.recv_led),
            ("send_led", &self.indicators.send_led),
            ("error_led", &self.indicators.error_led),
        ] {
            if matches!(led, Some(path) if path.as_os_str().is_empty()) {
                return Err(KissError::Config(
                    toml::de::Error::custom(format!("{} path cannot be empty", name))
                ));
            }
        }

        Ok(())
    }
}
