//! CLI argument definitions
//!
//! All Clap derive structs for `telemu` command-line parsing. Every default
//! reproduces the emulated device's fixed configuration, so a bare
//! `telemu run` behaves exactly like the hardware it stands in for.

use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::parse_delay;
use crate::error::ExitCode;
pub use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Flight telemetry serial emulator for ground-station testing.
#[derive(Parser, Debug)]
#[command(name = "telemu", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TELEMU_COLOR")]
    pub color: ColorChoice,

    /// Log output format on stderr.
    #[arg(long, default_value = "human", global = true, env = "TELEMU_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Exit code for a command line clap could not turn into a [`Cli`].
///
/// `--help` and `--version` are not failures; everything else clap rejects
/// is a usage error.
#[must_use]
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::USAGE_ERROR,
    }
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transmit the flight profile to a serial device.
    Run(RunArgs),

    /// List serial devices visible to the host.
    Devices(DevicesArgs),

    /// Inspect or validate phase profiles.
    Profile(ProfileCommand),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Run Command
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Open this port directly instead of searching for a device.
    #[arg(short, long, env = "TELEMU_PORT")]
    pub port: Option<String>,

    /// Substring a device description must contain to be selected.
    #[arg(
        short = 'm',
        long = "match",
        default_value = crate::config::DEFAULT_DEVICE_MATCH,
        env = "TELEMU_DEVICE_MATCH"
    )]
    pub device_match: String,

    /// Serial line rate in baud.
    #[arg(short, long, default_value_t = crate::config::DEFAULT_BAUD_RATE, env = "TELEMU_BAUD")]
    pub baud: u32,

    /// Pause after each frame (e.g. `100ms`, `1s`).
    #[arg(long, default_value = "100ms", value_parser = parse_delay, env = "TELEMU_FRAME_DELAY")]
    pub delay: Duration,

    /// YAML phase profile to transmit instead of the built-in flight.
    #[arg(long, env = "TELEMU_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Write JSONL run events to this file.
    #[arg(long)]
    pub events_file: Option<PathBuf>,

    /// Serve Prometheus metrics on 127.0.0.1:<PORT>.
    #[arg(long)]
    pub metrics_port: Option<u16>,
}

// ============================================================================
// Devices Command
// ============================================================================

/// Arguments for `devices`.
#[derive(Args, Debug)]
pub struct DevicesArgs {
    /// Substring used to mark the device `run` would select.
    #[arg(
        short = 'm',
        long = "match",
        default_value = crate::config::DEFAULT_DEVICE_MATCH,
        env = "TELEMU_DEVICE_MATCH"
    )]
    pub device_match: String,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Profile Command
// ============================================================================

/// Profile commands.
#[derive(Args, Debug)]
pub struct ProfileCommand {
    /// Profile subcommand.
    #[command(subcommand)]
    pub subcommand: ProfileSubcommand,
}

/// Profile subcommands.
#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Print a profile's phases.
    Show(ProfileShowArgs),

    /// Validate profile files without transmitting.
    Validate(ProfileValidateArgs),
}

/// Arguments for `profile show`.
#[derive(Args, Debug)]
pub struct ProfileShowArgs {
    /// Profile file; the built-in flight profile when omitted.
    #[arg(long, env = "TELEMU_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `profile validate`.
#[derive(Args, Debug)]
pub struct ProfileValidateArgs {
    /// Profile files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
