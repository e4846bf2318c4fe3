//! Bootstrap configuration loading and data folder resolution
//!
//! Configuration is read once at startup and cannot change while running.
//!
//! Data folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `RADIO_DATA_DIR` environment variable
//! 3. `data_dir` in the TOML config file
//! 4. Compiled default `./data` (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the data folder
pub const DATA_DIR_ENV: &str = "RADIO_DATA_DIR";

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "radio-episodes";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the program source files (optional)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the bootstrap config
    ///
    /// An explicit path must exist. Without one, the platform default location
    /// is tried and a missing file yields built-in defaults.
    ///
    /// Returns the config and the file it came from, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                let config = Self::from_file(&path)?;
                Ok((config, Some(path)))
            }
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok((Self::default(), None))
            }
            None => Ok((Self::default(), None)),
        }
    }
}

/// Default config file location for the platform
///
/// e.g. `~/.config/radio-episodes/config.toml` on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Where the resolved data folder came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDirSource {
    CommandLine,
    Environment,
    ConfigFile,
    Default,
}

impl fmt::Display for DataDirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataDirSource::CommandLine => "command line",
            DataDirSource::Environment => DATA_DIR_ENV,
            DataDirSource::ConfigFile => "config file",
            DataDirSource::Default => "compiled default",
        };
        f.write_str(s)
    }
}

/// Resolves the data folder following the priority order above
#[derive(Debug, Clone, Default)]
pub struct DataDirResolver {
    cli_arg: Option<PathBuf>,
    config_value: Option<PathBuf>,
}

impl DataDirResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_config_value(mut self, path: Option<PathBuf>) -> Self {
        self.config_value = path;
        self
    }

    pub fn resolve(&self) -> (PathBuf, DataDirSource) {
        let (path, source) = if let Some(path) = &self.cli_arg {
            (path.clone(), DataDirSource::CommandLine)
        } else if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            (PathBuf::from(path), DataDirSource::Environment)
        } else if let Some(path) = &self.config_value {
            (path.clone(), DataDirSource::ConfigFile)
        } else {
            (default_data_dir(), DataDirSource::Default)
        };

        info!("Data folder: {} (from {})", path.display(), source);
        (path, source)
    }
}

/// Compiled default data folder, relative to the working directory
pub fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
