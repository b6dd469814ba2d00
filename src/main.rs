//! `telemu`: flight telemetry serial emulator

use clap::Parser;

use telemu::cli::args::{Cli, parse_error_exit_code};
use telemu::cli::commands;
use telemu::error::ExitCode;
use telemu::observability::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = parse_error_exit_code(&err);
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    let result = commands::dispatch(cli).await;

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) if e.is_console_message() => {
            println!("{e}");
            std::process::exit(e.exit_code());
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
