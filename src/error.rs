//! Error types for `telemu`
//!
//! A single error hierarchy covering configuration, transport and I/O
//! failures, with a mapping onto process exit codes.
//!
//! Device discovery outcomes ("no devices", "no match") are deliberately
//! absent here: they are normal results of
//! [`select_device`](crate::transport::select_device), not errors.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `telemu` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution (including clean discovery failures)
    pub const SUCCESS: i32 = 0;

    /// Configuration error (invalid profile, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Transport error (port could not be opened, write failed)
    pub const TRANSPORT_ERROR: i32 = 4;

    /// Usage error (invalid arguments)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `telemu` operations.
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// Profile loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Serial transport error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl EmulatorError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Transport(_) => ExitCode::TRANSPORT_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }

    /// Whether this error is reported as a bare console line on stdout
    /// rather than as an `error:` diagnostic on stderr.
    ///
    /// Only a refused open qualifies: its message is one of the canned
    /// console lines alongside the two discovery misses.
    #[must_use]
    pub const fn is_console_message(&self) -> bool {
        matches!(self, Self::Transport(TransportError::OpenFailed { .. }))
    }

    /// Short category label used for the `telemu_errors_total` metric.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => "config",
            Self::Transport(_) => "transport",
            Self::Io(_) => "io",
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Profile loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the profile file (`<inline>` for string sources)
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Profile validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the profile file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced profile file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while checking a phase table.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "phases[2].code")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - prevents the profile from being used
    Error,
    /// Warning - the profile still loads
    Warning,
}

// ============================================================================
// Transport Errors
// ============================================================================

/// Serial transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The host's serial device list could not be read
    #[error("failed to enumerate serial devices: {0}")]
    Enumeration(String),

    /// Matching device exists but could not be opened
    #[error("error connecting to {description}, perhaps it is already in use?")]
    OpenFailed {
        /// Description of the device we tried to open
        description: String,
        /// Underlying driver error
        #[source]
        source: std::io::Error,
    },

    /// A frame could not be written to an open port
    #[error("write to {port} failed: {source}")]
    WriteFailed {
        /// Port name of the transport
        port: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Operation attempted on a transport that was already closed
    #[error("transport closed: {0}")]
    Closed(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `telemu` operations.
pub type Result<T> = std::result::Result<T, EmulatorError>;

// ============================================================================
// Tests
// ============================================================================
