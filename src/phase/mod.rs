//! Flight phases.
//!
//! # Architecture
//!
//! - [`PhaseTable`]: ordered phase records (code, description, ticks)
//! - [`Sequencer`]: walks the table and drives the frame transmitter

pub mod sequencer;
pub mod table;

pub use sequencer::{RunSummary, Sequencer};
pub use table::{DEFAULT_TICKS_PER_PHASE, Phase, PhaseTable, SIMULATION_FINISHED};
