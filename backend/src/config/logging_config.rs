use std::path::PathBuf;

use serde::Deserialize;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_file_path: String,
    pub log_level: String,
    pub enable_console: bool,
    pub enable_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_file_path: "effort-logger.log".to_string(),
            log_level: "info".to_string(),
            enable_console: false,
            enable_file: true,
        }
    }
}

impl LoggingConfig {
    /// Settings for the `logging` crate. An unknown level is reported in the
    /// error so the caller can decide whether to fall back.
    pub fn to_settings(&self) -> logging::Result<logging::LogSettings> {
        let level = self.log_level.parse::<logging::LogLevel>()?;
        let file_path = if self.enable_file {
            Some(PathBuf::from(&self.log_file_path))
        } else {
            None
        };
        Ok(logging::LogSettings {
            level,
            file_path,
            console: self.enable_console,
        })
    }
}
