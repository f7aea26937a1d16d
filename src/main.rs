use std::error::Error;
use std::process;

use clap::Parser;
use tracing::Dispatch;

use students::cli::output;
use students::cli::{execute_command, normalize_args, Cli, CliError, CliResult};
use students::config::Settings;
use students::exitcode;
use students::infrastructure::di::ServiceContainer;
use students::infrastructure::logging::file_dispatch;

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let code = match run(&cli) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    };
    process::exit(code);
}

fn run(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;

    let dispatch = file_dispatch(&settings.log_file, cli.verbose).unwrap_or_else(|e| {
        output::warning(&format!("logging disabled: {e}"));
        Dispatch::none()
    });

    let container = ServiceContainer::new(settings);
    tracing::dispatcher::with_default(&dispatch, || {
        tracing::info!("students {} started", env!("CARGO_PKG_VERSION"));
        let result = execute_command(cli, &container);
        if let Err(e) = &result {
            tracing::error!("{e}");
        }
        result
    })
}

/// Print the error and every underlying cause.
/// Layer wrappers repeat their inner message, so repeats are skipped.
fn report(e: &CliError) {
    output::error(e);
    let mut last = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if message != last {
            output::cause(&message);
            last = message;
        }
        source = cause.source();
    }
}
