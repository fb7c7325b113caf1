//! Application configuration

pub mod effort_logger_config;
pub mod logging_config;
pub mod storage_config;

pub use effort_logger_config::{DEFAULT_CONFIG_FILE, EffortLoggerConfig};
pub use logging_config::LoggingConfig;
pub use storage_config::StorageConfig;
