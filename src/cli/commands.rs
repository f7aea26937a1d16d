//! Command dispatch
//!
//! `dispatch` runs a command against the services and reports what should
//! be shown; `execute_command` prints it.

use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{info, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::Student;
use crate::infrastructure::di::ServiceContainer;

/// Shown by `display` and `select` when the data file is absent.
pub const NO_DATA_FILE: &str = "No data file found.";
/// Shown by `save` when the data file is absent.
pub const NO_DATA_TO_SAVE: &str = "No data to save.";
/// Shown by `load` when the data file is absent.
pub const FILE_NOT_FOUND: &str = "File not found.";

/// Result of a successfully dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to print
    Silent,
    /// Print the students as a table
    Listing(Vec<Student>),
    /// Required data file was absent; print the message
    Missing(&'static str),
    /// Print text verbatim
    Text(String),
}

/// Dispatch the parsed command and print its outcome.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match dispatch(&cli.command, container)? {
        Outcome::Silent => {}
        Outcome::Listing(students) => output::info(&output::render_table(&students)),
        Outcome::Missing(message) => output::info(message),
        Outcome::Text(text) => print!("{text}"),
    }
    Ok(())
}

/// Run one command.
pub fn dispatch(command: &Commands, container: &ServiceContainer) -> CliResult<Outcome> {
    match command {
        Commands::Add {
            file,
            name,
            group,
            grade,
        } => cmd_add(container, file, Student::new(name, *group, grade)),
        Commands::Display { file } => {
            cmd_display(container, &data_file(file, &container.settings))
        }
        Commands::Select { file, min_average } => cmd_select(
            container,
            &data_file(file, &container.settings),
            min_average.unwrap_or(container.settings.min_average),
        ),
        Commands::Save { file } => cmd_save(container, file),
        Commands::Load { file } => cmd_load(container, file),
        Commands::Config { command } => cmd_config(&container.settings, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let mut buf = Vec::new();
            generate(*shell, &mut cmd, "students", &mut buf);
            Ok(Outcome::Text(String::from_utf8_lossy(&buf).into_owned()))
        }
    }
}

fn data_file(file: &Option<PathBuf>, settings: &Settings) -> PathBuf {
    file.clone().unwrap_or_else(|| settings.data_file.clone())
}

#[instrument(skip_all, fields(file = %file.display()))]
fn cmd_add(container: &ServiceContainer, file: &Path, student: Student) -> CliResult<Outcome> {
    info!("add: name={:?} group={} grade={:?}", student.name, student.group, student.grade);
    let students = container.students.add(file, student)?;
    info!("add: {} students in {}", students.len(), file.display());
    Ok(Outcome::Silent)
}

#[instrument(skip_all, fields(file = %file.display()))]
fn cmd_display(container: &ServiceContainer, file: &Path) -> CliResult<Outcome> {
    if !container.students.exists(file) {
        info!("display: {} not found", file.display());
        return Ok(Outcome::Missing(NO_DATA_FILE));
    }
    let students = container.students.load(file)?;
    info!("display: {} students", students.len());
    Ok(Outcome::Listing(students))
}

#[instrument(skip_all, fields(file = %file.display()))]
fn cmd_select(container: &ServiceContainer, file: &Path, min_average: f64) -> CliResult<Outcome> {
    if !min_average.is_finite() {
        return Err(CliError::InvalidArgs(format!(
            "--min-average must be a finite number, got {min_average}"
        )));
    }
    if !container.students.exists(file) {
        info!("select: {} not found", file.display());
        return Ok(Outcome::Missing(NO_DATA_FILE));
    }
    let selected = container.students.select(file, min_average)?;
    info!("select: {} students with average >= {}", selected.len(), min_average);
    Ok(Outcome::Listing(selected))
}

#[instrument(skip_all, fields(file = %file.display()))]
fn cmd_save(container: &ServiceContainer, file: &Path) -> CliResult<Outcome> {
    if !container.students.exists(file) {
        info!("save: {} not found", file.display());
        return Ok(Outcome::Missing(NO_DATA_TO_SAVE));
    }
    let count = container.students.resave(file)?;
    info!("save: wrote {} students", count);
    Ok(Outcome::Silent)
}

#[instrument(skip_all, fields(file = %file.display()))]
fn cmd_load(container: &ServiceContainer, file: &Path) -> CliResult<Outcome> {
    if !container.students.exists(file) {
        info!("load: {} not found", file.display());
        return Ok(Outcome::Missing(FILE_NOT_FOUND));
    }
    let students = container.students.load(file)?;
    info!("load: {} students", students.len());
    Ok(Outcome::Listing(students))
}

fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<Outcome> {
    let text = match command {
        ConfigCommands::Show => settings.to_toml()?,
        ConfigCommands::Path => match global_config_path() {
            Some(path) => format!("{}\n", path.display()),
            None => "no config directory available on this platform\n".to_string(),
        },
        ConfigCommands::Template => Settings::template(),
    };
    Ok(Outcome::Text(text))
}
