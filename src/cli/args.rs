//! CLI argument definitions using clap

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Record and query a list of students persisted to an XML file
#[derive(Parser, Debug)]
#[command(name = "students")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Add a new student
    Add {
        /// Path to the data file (created if absent)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Student's name
        #[arg(short, long)]
        name: String,
        /// Student's group
        #[arg(short, long, allow_negative_numbers = true)]
        group: i64,
        /// Student's grades, space separated (e.g. "5 4 5"); also accepted as -gr
        #[arg(short = 'r', long, visible_alias = "gr")]
        grade: String,
    },

    /// Display all students
    Display {
        /// Path to the data file (default: configured data_file)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Select students whose average grade reaches the threshold
    Select {
        /// Path to the data file (default: configured data_file)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Minimum average (default: configured min_average, 4.0)
        #[arg(short, long)]
        min_average: Option<f64>,
    },

    /// Save students list to file
    Save {
        /// File name to save
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Load students list from file
    Load {
        /// File name to load
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file path
    Path,
    /// Print a config file template
    Template,
}

/// Rewrite the two-letter `-gr` grade flag to its long form.
///
/// Short flags are single characters, so clap would read `-gr` as `-g r`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            match arg.to_str() {
                Some("-gr") => OsString::from("--gr"),
                Some(s) if s.starts_with("-gr=") => OsString::from(format!("-{s}")),
                _ => arg,
            }
        })
        .collect()
}
