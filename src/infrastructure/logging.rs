//! Log sink construction
//!
//! Builds a `tracing` dispatcher that appends to the configured log file.
//! The dispatcher is handed to the caller instead of being installed
//! globally, see [`tracing::dispatcher::with_default`].

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Dispatch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::infrastructure::{InfraError, InfraResult};

/// Environment variable holding an optional `EnvFilter` directive.
pub const LOG_ENV: &str = "STUDENTS_LOG";

/// Create a dispatcher writing timestamped lines to `path` (appending).
///
/// Level comes from `STUDENTS_LOG` if set, else INFO (DEBUG when `verbose`).
pub fn file_dispatch(path: &Path, verbose: bool) -> InfraResult<Dispatch> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| InfraError::io(format!("open log file {}", path.display()), e))?;

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_filter(env_filter),
    );

    Ok(Dispatch::new(subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_log_file_when_logging_then_appends_info_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("students.log");
        std::fs::write(&path, "previous line\n").unwrap();

        let dispatch = file_dispatch(&path, false).unwrap();
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!("command=display");
            tracing::debug!("hidden at info level");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous line\n"));
        assert!(content.contains("INFO"));
        assert!(content.contains("command=display"));
        assert!(!content.contains("hidden at info level"));
    }

    #[test]
    fn given_unopenable_path_when_building_then_io_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no-such-dir").join("students.log");
        let err = file_dispatch(&path, false).unwrap_err();
        assert!(matches!(err, InfraError::Io { .. }));
    }
}
