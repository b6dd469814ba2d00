//! Emulator configuration.
//!
//! Defaults reproduce the fixed configuration of the device being emulated:
//! 115200-8N1 with non-blocking writes, a 100 ms frame cadence, a `ttyACM0`
//! device tag and the built-in flight profile. CLI flags and their
//! environment fallbacks may override each of them.
//!
//! - [`loader`]: YAML profile loading
//! - [`validation`]: phase table validation

pub mod loader;
pub mod validation;

use std::time::Duration;

use tokio_serial::{DataBits, Parity, StopBits};

use crate::phase::PhaseTable;

/// Substring a device description must contain to be selected.
pub const DEFAULT_DEVICE_MATCH: &str = "ttyACM0";

/// Serial line rate in baud.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Delay after each transmitted frame.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Serial line configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    /// Line rate in baud.
    pub baud_rate: u32,
    /// Data bits per character.
    pub data_bits: DataBits,
    /// Parity mode.
    pub parity: Parity,
    /// Stop bits per character.
    pub stop_bits: StopBits,
    /// I/O timeout; zero makes writes non-blocking.
    pub write_timeout: Duration,
}

impl SerialSettings {
    /// 8N1 at the given baud rate with non-blocking writes.
    #[must_use]
    pub const fn with_baud_rate(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            write_timeout: Duration::ZERO,
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self::with_baud_rate(DEFAULT_BAUD_RATE)
    }
}

/// Fully resolved configuration for one emulator run.
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    /// Identifying substring used by device selection.
    pub device_match: String,
    /// Explicit port; skips device discovery when set.
    pub port: Option<String>,
    /// Serial line configuration.
    pub serial: SerialSettings,
    /// Pause after each frame.
    pub frame_delay: Duration,
    /// Phases to transmit.
    pub profile: PhaseTable,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            device_match: DEFAULT_DEVICE_MATCH.to_owned(),
            port: None,
            serial: SerialSettings::default(),
            frame_delay: DEFAULT_FRAME_DELAY,
            profile: PhaseTable::flight_profile(),
        }
    }
}

/// Parses a delay such as `100ms` or `1s`.
///
/// # Errors
///
/// Returns a message suitable for clap if the value is not a duration.
pub fn parse_delay(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value).map_err(|e| format!("invalid delay '{value}': {e}"))
}
