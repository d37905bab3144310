//! Runtime configuration for the student store.
//!
//! # Responsibility
//! - Resolve the backing-file path and logging settings.
//! - Read overrides from the process environment.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Logging stays disabled unless a log directory is configured.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

/// Default backing file name, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "estudiantes.txt";

pub const ENV_DATA_FILE: &str = "STUDENT_RECORDS_FILE";
pub const ENV_LOG_LEVEL: &str = "STUDENT_RECORDS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STUDENT_RECORDS_LOG_DIR";

/// Resolved store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Flat file holding one `id,name,age` line per student.
    pub data_file: PathBuf,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Absolute log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Default settings with the data file placed inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            data_file: dir.as_ref().join(DEFAULT_DATA_FILE),
            ..Self::default()
        }
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults for
    /// missing or blank values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            data_file: read(ENV_DATA_FILE)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}
