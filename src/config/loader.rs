//! Profile loading.
//!
//! Reads a YAML phase table, deserializes it and runs the
//! [`Validator`](super::validation::Validator) over the result. Any
//! validation error fails the load; warnings are returned to the caller.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ValidationIssue};
use crate::phase::PhaseTable;

use super::validation::Validator;

/// A successfully loaded profile.
#[derive(Debug)]
pub struct LoadResult {
    /// Validated phase table.
    pub table: PhaseTable,
    /// Non-fatal issues found during validation.
    pub warnings: Vec<ValidationIssue>,
}

/// Loads and validates a profile file.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if `path` does not exist,
/// [`ConfigError::ParseError`] for unreadable or malformed YAML, and
/// [`ConfigError::ValidationError`] if the table fails validation.
pub fn load_profile(path: &Path) -> Result<LoadResult, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    load_profile_str(&raw, path)
}

/// Loads and validates a profile from YAML text.
///
/// `source` is only used for error messages.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] for malformed YAML and
/// [`ConfigError::ValidationError`] if the table fails validation.
pub fn load_profile_str(yaml: &str, source: &Path) -> Result<LoadResult, ConfigError> {
    let table: PhaseTable = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let result = Validator::new().validate(&table);
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: source.display().to_string(),
            errors: result.errors,
        });
    }

    Ok(LoadResult {
        table,
        warnings: result.warnings,
    })
}

/// Placeholder source name for profiles that did not come from a file.
#[must_use]
pub fn inline_source() -> PathBuf {
    PathBuf::from("<inline>")
}
