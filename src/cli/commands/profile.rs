//! `profile` command handlers
//!
//! Implements `profile show` and `profile validate`.

use std::io::Write;

use crate::cli::args::{OutputFormat, ProfileShowArgs, ProfileValidateArgs};
use crate::config::loader::load_profile;
use crate::error::{ConfigError, EmulatorError};
use crate::phase::PhaseTable;

/// Print a profile's phases.
///
/// # Errors
///
/// Returns a config error if the profile file cannot be loaded.
pub fn show(args: &ProfileShowArgs) -> Result<(), EmulatorError> {
    let table = match args.profile {
        Some(ref path) => load_profile(path).map_err(report)?.table,
        None => PhaseTable::flight_profile(),
    };
    let mut stdout = std::io::stdout();
    render(&table, args.format, &mut stdout)
}

/// Renders `table` to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn render<W: Write>(
    table: &PhaseTable,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), EmulatorError> {
    match format {
        OutputFormat::Human => {
            for phase in table {
                writeln!(out, "{phase} ({} ticks)", phase.ticks)?;
            }
            writeln!(out, "{} phases, {} frames", table.len(), table.total_ticks())?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, table)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Validate profile files without transmitting.
///
/// Stops at the first invalid file.
///
/// # Errors
///
/// Returns a config error if any file fails to load, or if `--strict` is
/// set and a file has warnings.
pub fn validate(args: &ProfileValidateArgs) -> Result<(), EmulatorError> {
    for path in &args.files {
        tracing::info!(file = %path.display(), "validating profile");
        let loaded = load_profile(path).map_err(report)?;

        for warning in &loaded.warnings {
            eprintln!("{}: {warning}", path.display());
        }
        if args.strict && !loaded.warnings.is_empty() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: loaded.warnings,
            }
            .into());
        }

        println!(
            "{}: ok ({} phases, {} frames)",
            path.display(),
            loaded.table.len(),
            loaded.table.total_ticks()
        );
    }
    Ok(())
}

/// Prints each validation issue to stderr before the error propagates.
fn report(err: ConfigError) -> ConfigError {
    if let ConfigError::ValidationError {
        ref path,
        ref errors,
    } = err
    {
        for issue in errors {
            eprintln!("{path}: {issue}");
        }
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    #[test]
    fn human_render_lists_phases() {
        let table = PhaseTable::new(vec![
            Phase::new('@', "Pad", 2),
            Phase::new('A', "Liftoff", 3),
        ]);
        let mut out = Vec::new();
        render(&table, OutputFormat::Human, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[@] Pad (2 ticks)\n[A] Liftoff (3 ticks)\n2 phases, 5 frames\n"
        );
    }

    #[test]
    fn json_render_round_trips() {
        let table = PhaseTable::flight_profile();
        let mut out = Vec::new();
        render(&table, OutputFormat::Json, &mut out).unwrap();
        let parsed: PhaseTable = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, table);
    }
}
