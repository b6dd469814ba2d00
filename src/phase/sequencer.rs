//! Phase sequencer.
//!
//! Walks a [`PhaseTable`] in declared order and drives the
//! [`FrameTransmitter`] once per tick. The run either completes every phase
//! or stops at the first write failure; nothing is skipped or retried.

use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use super::PhaseTable;
use crate::error::Result;
use crate::observability::metrics;
use crate::observability::{Event, EventEmitter};
use crate::transmitter::FrameTransmitter;
use crate::transport::Transport;

/// Totals for one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Phases announced.
    pub phases: usize,
    /// Frames written.
    pub frames_sent: u64,
    /// Bytes written.
    pub bytes_sent: u64,
    /// Time from the first announcement to the end of the last delay.
    pub elapsed: Duration,
}

/// Drives a full transmission of one phase table.
#[derive(Debug)]
pub struct Sequencer<'a> {
    table: &'a PhaseTable,
    frame_delay: Duration,
    emitter: &'a EventEmitter,
}

impl<'a> Sequencer<'a> {
    /// Creates a sequencer for `table`.
    #[must_use]
    pub const fn new(table: &'a PhaseTable, frame_delay: Duration, emitter: &'a EventEmitter) -> Self {
        Self {
            table,
            frame_delay,
            emitter,
        }
    }

    /// Transmits every phase, announcing each one on `console`.
    ///
    /// Finishes by printing `<seconds> seconds elapsed`. The transport is
    /// borrowed, not consumed: closing it stays with the caller on both the
    /// success and the error path.
    ///
    /// # Errors
    ///
    /// Returns a transport error if a frame write fails, or an I/O error if
    /// the console cannot be written.
    pub async fn run<W: Write>(
        &self,
        transport: &mut dyn Transport,
        console: &mut W,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let mut transmitter = FrameTransmitter::new(transport, self.frame_delay, self.emitter);
        let mut previous = None;

        for (index, phase) in self.table.iter().enumerate() {
            writeln!(console, "{phase}")?;
            tracing::info!(
                code = %phase.code,
                description = %phase.description,
                ticks = phase.ticks,
                "entering phase"
            );
            metrics::set_current_phase(phase.code, previous);
            self.emitter.emit(Event::PhaseEntered {
                timestamp: Utc::now(),
                code: phase.code,
                description: phase.description.clone(),
                phase_index: index,
            });

            for tick in 0..phase.ticks {
                transmitter.transmit(phase.code, tick).await?;
            }
            previous = Some(phase.code);
        }

        let elapsed = started.elapsed();
        writeln!(console, "{} seconds elapsed", elapsed.as_secs_f64())?;

        Ok(RunSummary {
            phases: self.table.len(),
            frames_sent: transmitter.frames_sent(),
            bytes_sent: transmitter.bytes_sent(),
            elapsed,
        })
    }
}
