//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/students/students.toml`
//! 3. Environment variables: `STUDENTS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, DEFAULT_MIN_AVERAGE};

/// Unified configuration for students.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Data file used when a command has no `--file` (default: students.xml)
    pub data_file: PathBuf,
    /// Log file, appended to on every invocation (default: students.log)
    pub log_file: PathBuf,
    /// Minimum average picked by `select` (default: 4.0)
    pub min_average: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("students.xml"),
            log_file: PathBuf::from("students.log"),
            min_average: DEFAULT_MIN_AVERAGE,
        }
    }
}

/// Get the XDG config directory for students.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "students").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("students.toml"))
}

impl Settings {
    /// Load settings from defaults, the global config file and `STUDENTS_*` env vars.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using `config_file` in place of the global config file.
    ///
    /// A missing file is skipped; an unreadable or malformed one is an error.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("data_file", defaults.data_file.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("log_file", defaults.log_file.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("min_average", defaults.min_average)
            .map_err(config_err)?;

        if let Some(path) = config_file {
            if path.exists() {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("STUDENTS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        if !settings.min_average.is_finite() {
            return Err(ApplicationError::Config {
                message: format!("min_average must be a finite number, got {}", settings.min_average),
            });
        }

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_file = PathBuf::from(expand_env_vars(&self.data_file.to_string_lossy()));
        self.log_file = PathBuf::from(expand_env_vars(&self.log_file.to_string_lossy()));
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# students configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/students/students.toml
#   Env:    STUDENTS_* environment variables (explicit overrides)

# Data file used by `display` and `select` when --file is not given
# data_file = "students.xml"

# Log file, one line appended per event
# log_file = "students.log"

# Minimum average grade picked by `select`
# min_average = 4.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
