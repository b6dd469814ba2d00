//! `tokio-serial` backed transport.
//!
//! Enumerates host ports with [`tokio_serial::available_ports`] and opens
//! them as async [`SerialStream`]s configured per [`SerialSettings`].

use std::ffi::OsStr;
use std::path::Path;

use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialPortInfo, SerialPortType, SerialStream};

use super::{DeviceInfo, Result, SerialBackend, Transport};
use crate::config::SerialSettings;
use crate::error::TransportError;

/// Builds the matching description for a port.
///
/// USB devices read `"<product> (<file name>)"`, falling back to the
/// manufacturer when no product string is reported. Everything else is
/// described by the port's file name alone.
#[must_use]
pub fn describe(port_name: &str, usb_label: Option<&str>) -> String {
    let file_name = Path::new(port_name)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(port_name);
    match usb_label {
        Some(label) if !label.trim().is_empty() => format!("{} ({file_name})", label.trim()),
        _ => file_name.to_owned(),
    }
}

impl From<SerialPortInfo> for DeviceInfo {
    fn from(info: SerialPortInfo) -> Self {
        let label = match &info.port_type {
            SerialPortType::UsbPort(usb) => usb.product.clone().or_else(|| usb.manufacturer.clone()),
            _ => None,
        };
        let description = describe(&info.port_name, label.as_deref());
        Self {
            port_name: info.port_name,
            description,
        }
    }
}

/// The host's serial subsystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSerial;

impl SerialBackend for SystemSerial {
    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        let ports = tokio_serial::available_ports()
            .map_err(|e| TransportError::Enumeration(e.to_string()))?;
        Ok(ports.into_iter().map(DeviceInfo::from).collect())
    }

    fn open(&self, device: &DeviceInfo, settings: &SerialSettings) -> Result<Box<dyn Transport>> {
        tracing::debug!(
            port = %device.port_name,
            baud = settings.baud_rate,
            "opening serial port"
        );
        let stream = tokio_serial::new(device.port_name.as_str(), settings.baud_rate)
            .data_bits(settings.data_bits)
            .parity(settings.parity)
            .stop_bits(settings.stop_bits)
            .timeout(settings.write_timeout)
            .open_native_async()
            .map_err(|e| TransportError::OpenFailed {
                description: device.description.clone(),
                source: e.into(),
            })?;
        Ok(Box::new(SerialTransport::new(
            device.port_name.clone(),
            stream,
        )))
    }
}

/// An open serial port.
///
/// The stream is dropped on [`close`](Transport::close), or when the
/// transport itself is dropped on an error path.
pub struct SerialTransport {
    port_name: String,
    stream: Option<SerialStream>,
}

impl SerialTransport {
    /// Wraps an already opened stream.
    #[must_use]
    pub const fn new(port_name: String, stream: SerialStream) -> Self {
        Self {
            port_name,
            stream: Some(stream),
        }
    }

    /// Whether the port is still held open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port_name", &self.port_name)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Transport for SerialTransport {
    async fn send_frame(&mut self, bytes: &[u8]) -> Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(TransportError::Closed(self.port_name.clone()));
        };
        // No flush here: flushing a serial stream is a blocking tcdrain.
        stream
            .write_all(bytes)
            .await
            .map_err(|source| TransportError::WriteFailed {
                port: self.port_name.clone(),
                source,
            })
    }

    /// Drains the line once, then drops the stream.
    ///
    /// The drain blocks until the driver has sent every queued byte.
    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream
                .flush()
                .await
                .map_err(|source| TransportError::WriteFailed {
                    port: self.port_name.clone(),
                    source,
                })?;
            tracing::debug!(port = %self.port_name, "serial port closed");
        }
        Ok(())
    }

    fn port_name(&self) -> &str {
        &self.port_name
    }
}
