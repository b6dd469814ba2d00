//! Command-line interface
//!
//! - [`args`]: Clap derive definitions
//! - [`commands`]: command dispatch and handlers

pub mod args;
pub mod commands;
