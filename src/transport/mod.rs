//! Serial transport abstraction layer.
//!
//! Two seams separate the emulator from the host's serial hardware:
//!
//! - [`SerialBackend`] enumerates devices and opens them
//! - [`Transport`] is one open, exclusively owned connection that frames
//!   are written to
//!
//! [`SystemSerial`] implements both over `tokio-serial`. Device selection
//! itself ([`select_device`]) is a pure function over a device snapshot.

pub mod serial;

pub use serial::{SerialTransport, SystemSerial};

use serde::Serialize;

use crate::config::SerialSettings;
use crate::error::TransportError;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Console message printed when the host has no serial devices at all.
pub const NO_DEVICES_MESSAGE: &str = "no serial devices found";

/// Console message printed when no device description matches.
pub const NO_MATCH_MESSAGE: &str = "No Arduino connected";

/// A serial device visible to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// OS port identifier (e.g. `/dev/ttyACM0`, `COM3`)
    pub port_name: String,
    /// Human-readable description, matched against the identifying substring
    pub description: String,
}

impl DeviceInfo {
    /// Creates a device descriptor.
    #[must_use]
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
        }
    }

    /// Describes an explicitly named port that bypassed discovery.
    #[must_use]
    pub fn from_port(port_name: &str) -> Self {
        Self::new(port_name, port_name)
    }
}

/// Outcome of device selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// First device whose description contains the identifying substring.
    Found(DeviceInfo),
    /// The device list was empty.
    NoDevices,
    /// Devices exist, but none matched.
    NoMatch,
}

impl Selection {
    /// Console message for the two not-found outcomes.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Found(_) => None,
            Self::NoDevices => Some(NO_DEVICES_MESSAGE),
            Self::NoMatch => Some(NO_MATCH_MESSAGE),
        }
    }
}

/// Selects the first device whose description contains `needle`.
///
/// Nothing is opened; this only inspects the snapshot.
#[must_use]
pub fn select_device(devices: &[DeviceInfo], needle: &str) -> Selection {
    if devices.is_empty() {
        return Selection::NoDevices;
    }
    devices
        .iter()
        .find(|d| d.description.contains(needle))
        .map_or(Selection::NoMatch, |d| Selection::Found(d.clone()))
}

/// Device enumeration and connection capability.
pub trait SerialBackend: Send + Sync {
    /// Takes a snapshot of the serial devices visible to the host.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Enumeration`] if the OS device list
    /// cannot be read. An empty list is not an error.
    fn list_devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Opens `device` with `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::OpenFailed`] if the port cannot be opened
    /// (already claimed, missing, permission denied).
    fn open(&self, device: &DeviceInfo, settings: &SerialSettings) -> Result<Box<dyn Transport>>;
}

/// An open serial connection.
///
/// Exclusively owned by the run; written only by the frame transmitter.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Hands the whole buffer to the device driver.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::WriteFailed`] on I/O failure, or
    /// [`TransportError::Closed`] if the transport was already closed.
    async fn send_frame(&mut self, bytes: &[u8]) -> Result<()>;

    /// Drains pending output and releases the underlying handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    async fn close(&mut self) -> Result<()>;

    /// Port this transport writes to, for logging.
    fn port_name(&self) -> &str;
}
