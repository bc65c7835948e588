//! # Indicator Lights
//!
//! LEDs and GPIO lines driven through a sysfs value file
//! (`/sys/class/leds/<name>/brightness`, `/sys/class/gpio/gpioN/value`).

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::IndicatorConfig;
use crate::link::{Indicator, Indicators};

/// Indicator that writes `1`/`0` to a sysfs file
#[derive(Debug, Clone)]
pub struct SysfsLed {
    path: PathBuf,
}

impl SysfsLed {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Indicator for SysfsLed {
    fn set(&mut self, on: bool) {
        let value = if on { "1" } else { "0" };
        if let Err(e) = fs::write(&self.path, value) {
            warn!("Failed to drive indicator {}: {}", self.path.display(), e);
        }
    }
}

/// Build the indicator set from configuration; unset entries stay unwired
pub fn from_config(config: &IndicatorConfig) -> Indicators {
    let wire = |path: &Option<PathBuf>| -> Option<Box<dyn Indicator>> {
        path.as_ref().map(|p| Box::new(SysfsLed::new(p)) as Box<dyn Indicator>)
    };

    Indicators {
        recv: wire(&config.recv_led),
        send: wire(&config.send_led),
        error: wire(&config.error_led),
    }
}
