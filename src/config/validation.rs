//! Phase table validation.
//!
//! Validation collects ALL issues rather than stopping at the first, so a
//! broken profile file is reported in one pass.

use std::collections::HashSet;

use crate::error::{Severity, ValidationIssue};
use crate::frame::FIELD_SEPARATOR;
use crate::phase::PhaseTable;

/// Result of phase table validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Phase table validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `table` and returns every issue found.
    #[must_use]
    pub fn validate(mut self, table: &PhaseTable) -> ValidationResult {
        if table.is_empty() {
            self.error("phases", "profile defines no phases");
        }

        let mut seen = HashSet::new();
        for (index, phase) in table.iter().enumerate() {
            let code_path = format!("phases[{index}].code");

            if !phase.code.is_ascii_graphic() {
                self.error(
                    &code_path,
                    &format!("phase code {:?} is not a printable ASCII character", phase.code),
                );
            } else if phase.code == FIELD_SEPARATOR {
                self.error(&code_path, "phase code cannot be the field separator ','");
            }

            if !seen.insert(phase.code) {
                self.error(&code_path, &format!("duplicate phase code '{}'", phase.code));
            }

            if phase.description.trim().is_empty() {
                self.warning(&format!("phases[{index}].description"), "description is empty");
            }

            if phase.ticks == 0 {
                self.warning(
                    &format!("phases[{index}].ticks"),
                    "phase is announced but emits no frames",
                );
            }
        }

        ValidationResult {
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_owned(),
            message: message.to_owned(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_owned(),
            message: message.to_owned(),
            severity: Severity::Warning,
        });
    }
}
