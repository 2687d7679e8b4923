//! Environment-driven configuration.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::project;

/// Crate-wide mutex for tests that mutate process environment variables.
///
/// The process environment is global state shared across all threads, so
/// every test that calls `set_var`/`remove_var` must hold this single lock.
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Include/exclude filtering for the tool catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolFilterConfig {
    /// Qualified identifiers removed from the discovered set.
    pub exclude: Vec<String>,
    /// Qualified identifiers appended to the discovered set. Each entry must
    /// resolve to a registered optional tool or it is skipped.
    pub include: Vec<String>,
}

/// Runtime configuration, resolved from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the inspected project. Workers run with this as their working
    /// directory and its `.env` drives environment sanitization.
    pub project_root: PathBuf,
    /// Explicit log file override. When unset, the log path is resolved per
    /// call from the project's `logs/` directory.
    pub log_file: Option<PathBuf>,
    /// Tool catalog filtering.
    pub tools: ToolFilterConfig,
}

impl Config {
    /// Resolve configuration from the environment.
    ///
    /// `STRATUM_PROJECT_ROOT` overrides project root detection;
    /// `STRATUM_LOG_FILE` pins the inspected log file;
    /// `STRATUM_TOOLS_EXCLUDE` / `STRATUM_TOOLS_INCLUDE` are comma-separated
    /// qualified tool identifiers.
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_root = match optional_env("STRATUM_PROJECT_ROOT")? {
            Some(path) => PathBuf::from(path),
            None => project::detect_project_root(&std::env::current_dir()?),
        };

        Ok(Self {
            project_root,
            log_file: optional_env("STRATUM_LOG_FILE")?.map(PathBuf::from),
            tools: ToolFilterConfig {
                exclude: parse_list_env("STRATUM_TOOLS_EXCLUDE")?,
                include: parse_list_env("STRATUM_TOOLS_INCLUDE")?,
            },
        })
    }
}

pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Parse a comma-separated list from an env var. Missing or empty -> empty.
pub(crate) fn parse_list_env(key: &str) -> Result<Vec<String>, ConfigError> {
    Ok(optional_env(key)?
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default())
}
