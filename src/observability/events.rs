//! Structured event stream for `telemu`.
//!
//! Discrete, typed events emitted during a run. Events are serialized as
//! newline-delimited JSON (JSONL) and carry a monotonically increasing
//! sequence number, so a ground-station test harness can line its own
//! receive log up against what was sent.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a run.
///
/// Each variant is tagged with `"type"` when serialized to JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The transport was opened and transmission is about to begin.
    RunStarted {
        /// When the run started.
        timestamp: DateTime<Utc>,
        /// Port being written to.
        port: String,
        /// Description of the selected device.
        device: String,
        /// Number of phases in the profile.
        phases: usize,
        /// Frames the full profile will emit.
        total_frames: u64,
    },

    /// A new phase has been entered.
    PhaseEntered {
        /// When the phase was announced.
        timestamp: DateTime<Utc>,
        /// Phase code.
        code: char,
        /// Phase description.
        description: String,
        /// Zero-based index of the phase in the profile.
        phase_index: usize,
    },

    /// One frame was written.
    FrameSent {
        /// When the write completed.
        timestamp: DateTime<Utc>,
        /// Phase code in field 0.
        code: char,
        /// Zero-based tick within the phase.
        tick: u32,
        /// Frame length in bytes.
        bytes: usize,
    },

    /// Every phase completed.
    RunCompleted {
        /// When the run ended.
        timestamp: DateTime<Utc>,
        /// Frames written.
        frames_sent: u64,
        /// Bytes written.
        bytes_sent: u64,
        /// Wall-clock duration of the transmission.
        elapsed_secs: f64,
    },

    /// The run ended early on a fatal error.
    RunFailed {
        /// When the failure occurred.
        timestamp: DateTime<Utc>,
        /// Human-readable error.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) increments the sequence counter,
/// serializes the event as a single JSON line, and flushes the underlying
/// writer. Serialization or I/O failures are silently dropped so that a
/// broken events file never interrupts transmission.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
