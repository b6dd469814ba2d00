//! Frame transmitter.
//!
//! Formats one [`TelemetryFrame`] per tick, writes it to the transport and
//! then holds for the frame delay. The delay follows every frame, including
//! the last one of a run, so a run of `n` frames lasts at least
//! `n × delay`.

use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::frame::TelemetryFrame;
use crate::observability::metrics;
use crate::observability::{Event, EventEmitter};
use crate::transport::{Result, Transport};

/// Writes frames to a borrowed transport at a fixed cadence.
pub struct FrameTransmitter<'a> {
    transport: &'a mut dyn Transport,
    delay: Duration,
    emitter: &'a EventEmitter,
    frames_sent: u64,
    bytes_sent: u64,
}

impl<'a> FrameTransmitter<'a> {
    /// Creates a transmitter over `transport`.
    pub fn new(transport: &'a mut dyn Transport, delay: Duration, emitter: &'a EventEmitter) -> Self {
        Self {
            transport,
            delay,
            emitter,
            frames_sent: 0,
            bytes_sent: 0,
        }
    }

    /// Sends one frame for phase `code`, then sleeps the frame delay.
    ///
    /// # Errors
    ///
    /// Propagates the transport's write error unchanged; nothing is retried.
    pub async fn transmit(&mut self, code: char, tick: u32) -> Result<()> {
        let frame = TelemetryFrame::now(code);
        let bytes = frame.to_wire();

        let started = Instant::now();
        self.transport.send_frame(&bytes).await?;
        let write_time = started.elapsed();

        let len = bytes.len() as u64;
        self.frames_sent += 1;
        self.bytes_sent += len;
        metrics::record_frame(code, len, write_time);
        tracing::trace!(
            port = self.transport.port_name(),
            frame = %frame,
            "frame sent"
        );
        self.emitter.emit(Event::FrameSent {
            timestamp: Utc::now(),
            code,
            tick,
            bytes: bytes.len(),
        });

        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    /// Frames written so far.
    #[must_use]
    pub const fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Bytes written so far.
    #[must_use]
    pub const fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl std::fmt::Debug for FrameTransmitter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTransmitter")
            .field("port", &self.transport.port_name())
            .field("delay", &self.delay)
            .field("frames_sent", &self.frames_sent)
            .finish_non_exhaustive()
    }
}
