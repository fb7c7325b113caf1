use std::path::PathBuf;

use serde::Deserialize;

use crate::infrastructure::{LEGACY_KEY, RecordFormat};

/// Where and how records are stored
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `user_info_encrypted/` and
    /// `planning_poker_data_encrypted/`.
    pub base_dir: PathBuf,
    pub cipher_key: i32,
    pub record_format: RecordFormat,
    /// Create the `user`/`password` identity on startup when missing.
    pub seed_default_identity: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            base_dir: PathBuf::from("."),
            cipher_key: LEGACY_KEY,
            record_format: RecordFormat::Delimited,
            seed_default_identity: true,
        }
    }
}
