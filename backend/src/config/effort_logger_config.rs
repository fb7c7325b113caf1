use std::path::Path;

use serde::Deserialize;

use crate::config::{LoggingConfig, StorageConfig};

/// File looked up when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "effort_logger_config.json";

/// EffortLogger configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffortLoggerConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl EffortLoggerConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> config_loader::Result<Self> {
        config_loader::load_json(path)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(content: &str) -> config_loader::Result<Self> {
        config_loader::parse_json(content, "inline JSON")
    }
}
