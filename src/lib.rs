//! `telemu` - Flight telemetry serial emulator
//!
//! Stands in for a flight-data device on a serial link: it finds the
//! device port, opens it at 115200-8N1 and transmits a scripted flight
//! (liftoff through landing) as 21-field ASCII frames at a fixed cadence,
//! so ground-station software can be exercised without live hardware.

pub mod cli;
pub mod config;
pub mod emulator;
pub mod error;
pub mod frame;
pub mod observability;
pub mod phase;
pub mod transmitter;
pub mod transport;
