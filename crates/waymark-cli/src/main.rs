mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    let operation = cli.command.operation();
    match commands::run_with_db(&cli.db, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::report_failure(operation, &err);
            ExitCode::FAILURE
        }
    }
}
