//! Emulator runtime.
//!
//! The [`Emulator`] wires device selection, the serial backend, the phase
//! sequencer and the event stream into one run:
//!
//! 1. pick a device (or take the explicit `--port`)
//! 2. open it
//! 3. transmit the whole profile
//! 4. close the transport, whether or not transmission succeeded

use std::io::Write;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::EmulatorConfig;
use crate::error::EmulatorError;
use crate::observability::metrics;
use crate::observability::{Event, EventEmitter};
use crate::phase::{RunSummary, Sequencer};
use crate::transport::{DeviceInfo, SerialBackend, Selection, Transport, select_device};

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every phase was transmitted.
    Completed(RunSummary),
    /// The host reported no serial devices; nothing was opened.
    NoDevices,
    /// No device description matched; nothing was opened.
    NoMatch,
}

/// One configured emulator run.
pub struct Emulator {
    config: EmulatorConfig,
    backend: Box<dyn SerialBackend>,
    event_emitter: EventEmitter,
}

impl Emulator {
    /// Creates an emulator over `backend`.
    #[must_use]
    pub fn new(
        config: EmulatorConfig,
        backend: Box<dyn SerialBackend>,
        event_emitter: EventEmitter,
    ) -> Self {
        Self {
            config,
            backend,
            event_emitter,
        }
    }

    /// Returns the event emitter (e.g. to inspect the event count).
    #[must_use]
    pub const fn event_emitter(&self) -> &EventEmitter {
        &self.event_emitter
    }

    /// Runs the emulator to completion, writing progress lines to `console`.
    ///
    /// Discovery failures print their canned message and return
    /// `Ok(RunOutcome::NoDevices | RunOutcome::NoMatch)`.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration fails, the selected port cannot be
    /// opened, a frame write fails, or `console` cannot be written.
    pub async fn run<W: Write>(&self, console: &mut W) -> Result<RunOutcome, EmulatorError> {
        let result = self.run_inner(console).await;
        if let Err(ref e) = result {
            metrics::record_error(e.category());
            self.event_emitter.emit(Event::RunFailed {
                timestamp: Utc::now(),
                reason: e.to_string(),
            });
        }
        result
    }

    async fn run_inner<W: Write>(&self, console: &mut W) -> Result<RunOutcome, EmulatorError> {
        let device = match self.resolve_device()? {
            Selection::Found(device) => device,
            other => {
                if let Some(message) = other.message() {
                    writeln!(console, "{message}")?;
                }
                info!(device_match = %self.config.device_match, "no device selected");
                return Ok(match other {
                    Selection::NoDevices => RunOutcome::NoDevices,
                    _ => RunOutcome::NoMatch,
                });
            }
        };

        let mut transport = self.backend.open(&device, &self.config.serial)?;
        let result = self.transmit(&device, transport.as_mut(), console).await;
        let closed = transport.close().await;

        let summary = match result {
            Ok(summary) => {
                closed?;
                summary
            }
            Err(e) => {
                if let Err(close_err) = closed {
                    warn!(error = %close_err, "failed to close transport after error");
                }
                return Err(e);
            }
        };

        self.event_emitter.emit(Event::RunCompleted {
            timestamp: Utc::now(),
            frames_sent: summary.frames_sent,
            bytes_sent: summary.bytes_sent,
            elapsed_secs: summary.elapsed.as_secs_f64(),
        });
        info!(
            frames = summary.frames_sent,
            bytes = summary.bytes_sent,
            elapsed_secs = summary.elapsed.as_secs_f64(),
            "run complete"
        );
        Ok(RunOutcome::Completed(summary))
    }

    /// Everything between open and close: announcement, start event and
    /// the full sequencer run.
    async fn transmit<W: Write>(
        &self,
        device: &DeviceInfo,
        transport: &mut dyn Transport,
        console: &mut W,
    ) -> Result<RunSummary, EmulatorError> {
        writeln!(console, "transmitting to {}", device.description)?;
        info!(
            port = %device.port_name,
            device = %device.description,
            baud = self.config.serial.baud_rate,
            "transport open"
        );

        self.event_emitter.emit(Event::RunStarted {
            timestamp: Utc::now(),
            port: device.port_name.clone(),
            device: device.description.clone(),
            phases: self.config.profile.len(),
            total_frames: self.config.profile.total_ticks(),
        });

        Sequencer::new(
            &self.config.profile,
            self.config.frame_delay,
            &self.event_emitter,
        )
        .run(transport, console)
        .await
    }

    fn resolve_device(&self) -> Result<Selection, EmulatorError> {
        if let Some(ref port) = self.config.port {
            debug!(%port, "explicit port, skipping discovery");
            return Ok(Selection::Found(DeviceInfo::from_port(port)));
        }
        let devices = self.backend.list_devices()?;
        debug!(count = devices.len(), "enumerated serial devices");
        Ok(select_device(&devices, &self.config.device_match))
    }
}

impl std::fmt::Debug for Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emulator")
            .field("config", &self.config)
            .field("event_emitter", &self.event_emitter)
            .finish_non_exhaustive()
    }
}
