//! `run` command handler
//!
//! Resolves the run configuration, then hands control to the
//! [`Emulator`] over the host's serial subsystem.

use crate::cli::args::RunArgs;
use crate::config::loader::load_profile;
use crate::config::{EmulatorConfig, SerialSettings};
use crate::emulator::Emulator;
use crate::error::EmulatorError;
use crate::observability::events::EventEmitter;
use crate::phase::PhaseTable;
use crate::transport::SystemSerial;

/// Transmit the profile to a serial device.
///
/// Discovery failures are reported on stdout and count as success.
///
/// # Errors
///
/// Returns a config error for an invalid `--profile`, an I/O error if the
/// events file or metrics listener cannot be set up, or a transport error
/// if the device cannot be opened or written.
pub async fn run(args: &RunArgs) -> Result<(), EmulatorError> {
    let config = build_config(args)?;

    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let event_emitter = if let Some(ref path) = args.events_file {
        EventEmitter::from_file(path)?
    } else {
        EventEmitter::noop()
    };

    let emulator = Emulator::new(config, Box::new(SystemSerial), event_emitter);
    let mut stdout = std::io::stdout();
    let outcome = emulator.run(&mut stdout).await?;
    tracing::debug!(?outcome, "run finished");
    Ok(())
}

/// Resolves CLI arguments into an [`EmulatorConfig`].
///
/// # Errors
///
/// Returns a config error if `--profile` is missing or invalid.
pub fn build_config(args: &RunArgs) -> Result<EmulatorConfig, EmulatorError> {
    let profile = match args.profile {
        Some(ref path) => {
            tracing::info!(profile = %path.display(), "loading profile");
            let loaded = load_profile(path)?;
            for warning in &loaded.warnings {
                tracing::warn!(location = %warning.path, "{}", warning.message);
            }
            loaded.table
        }
        None => PhaseTable::flight_profile(),
    };

    Ok(EmulatorConfig {
        device_match: args.device_match.clone(),
        port: args.port.clone(),
        serial: SerialSettings::with_baud_rate(args.baud),
        frame_delay: args.delay,
        profile,
    })
}
