//! EffortLogger record store
//!
//! Per-user effort logs and planning poker results kept as ciphered text
//! files, with a console front end driving the use cases.

pub mod application;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-export commonly used types for integration tests
pub use application::handlers::{CommandHandler, Reply};
pub use config::EffortLoggerConfig;
pub use error::{EffortLoggerError, Result};
pub use infrastructure::{EncryptedFileStore, EntityKind};
