//! Storage configuration shared by the registry and the registration log

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ARTIFACT_EXTENSION;

/// Where artifacts and registration logs live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the model artifacts
    pub model_dir: PathBuf,
    /// Directory holding the per-district registration CSV files
    pub registration_dir: PathBuf,
    /// File extension of model artifacts (without the dot)
    pub artifact_extension: String,
    /// Load every known artifact at startup instead of on first use
    pub preload_on_startup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            registration_dir: PathBuf::from("registrations"),
            artifact_extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            preload_on_startup: true,
        }
    }
}
