//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::GradetreeConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, an optional explicit file and environment.
    pub fn load(explicit: Option<&Path>) -> Result<GradetreeConfig, ApiError> {
        let config = MergeService::load(explicit)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<GradetreeConfig, ApiError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> GradetreeConfig {
        GradetreeConfig::default()
    }
}
