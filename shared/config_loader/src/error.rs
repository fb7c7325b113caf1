use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while locating, reading or parsing a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config file at the given path or any searched location.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The file exists but could not be read.
    #[error("cannot read configuration file: {0}")]
    ReadError(String),

    /// The content is not valid JSON for the requested type.
    #[error("invalid configuration in {origin}: {message}")]
    ParseError { origin: String, message: String },
}
