//! StorageConfig and data directory resolution.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the JSON document store; None means `$XDG_DATA_HOME/gradetree`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the data directory, preferring an override (e.g. a CLI flag).
    pub fn resolve_data_dir(&self, override_dir: Option<PathBuf>) -> Result<PathBuf, ApiError> {
        if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
            return Ok(dir);
        }
        if let Some(dir) = self.data_dir.clone().filter(|d| !d.as_os_str().is_empty()) {
            return Ok(dir);
        }
        xdg::default_data_dir()
    }
}
