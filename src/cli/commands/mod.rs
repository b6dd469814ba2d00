//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod devices;
pub mod profile;
pub mod run;
pub mod version;

use crate::cli::args::{Cli, Commands, ProfileSubcommand};
use crate::error::EmulatorError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), EmulatorError> {
    match cli.command {
        Commands::Run(args) => run::run(&args).await,
        Commands::Devices(args) => devices::run(&args),
        Commands::Profile(cmd) => match cmd.subcommand {
            ProfileSubcommand::Show(args) => profile::show(&args),
            ProfileSubcommand::Validate(args) => profile::validate(&args),
        },
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
