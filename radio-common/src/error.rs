//! Common error types for the radio episodes service

use thiserror::Error;

/// Common result type for catalog and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the radio episodes crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text parsing error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML configuration file could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source header row lacks a required column
    #[error("Missing column: {0}")]
    MissingColumn(String),
}
