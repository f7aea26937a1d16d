//! CLI layer: argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod output;

pub use args::{normalize_args, Cli, Commands, ConfigCommands};
pub use commands::{dispatch, execute_command, Outcome};
pub use error::{CliError, CliResult};
