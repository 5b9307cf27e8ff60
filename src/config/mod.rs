//! Configuration
//!
//! Layered configuration built with the `config` crate. Precedence, lowest to
//! highest: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/gradetree/config.toml`), an explicit file, and
//! `GRADETREE__*` environment variables (`__` separates nested keys, e.g.
//! `GRADETREE__GRADING__PASS_MARK=60`).

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage::StorageConfig;

use crate::aggregate::GradeScale;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::DEFAULT_CHILD_WEIGHT;
use crate::validation::ValidationOptions;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradetreeConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub grading: GradingSettings,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl GradetreeConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        self.grading.validate()
    }
}

fn default_weight() -> f64 {
    DEFAULT_CHILD_WEIGHT
}

fn default_pass_mark() -> f64 {
    50.0
}

/// Grading behaviour shared by every course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingSettings {
    /// Weight of components created without an explicit weight.
    #[serde(default = "default_weight")]
    pub default_weight: f64,

    /// Totals below this are listed as at risk.
    #[serde(default = "default_pass_mark")]
    pub pass_mark: f64,

    /// Refuse to save a rubric whose top-level weights do not sum to 100.
    #[serde(default)]
    pub require_full_weight: bool,

    /// Replaces the built-in 80/75/70/65/60/55/50 scale when set.
    #[serde(default)]
    pub grade_scale: Option<GradeScale>,
}

impl Default for GradingSettings {
    fn default() -> Self {
        Self {
            default_weight: default_weight(),
            pass_mark: default_pass_mark(),
            require_full_weight: false,
            grade_scale: None,
        }
    }
}

impl GradingSettings {
    pub fn scale(&self) -> GradeScale {
        self.grade_scale.clone().unwrap_or_default()
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            require_full_weight: self.require_full_weight,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.default_weight.is_finite() || self.default_weight < 0.0 {
            return Err(ApiError::ConfigError(format!(
                "grading.default_weight must be a non-negative number, got {}",
                self.default_weight
            )));
        }
        if !self.pass_mark.is_finite() {
            return Err(ApiError::ConfigError(format!(
                "grading.pass_mark must be finite, got {}",
                self.pass_mark
            )));
        }
        if let Some(scale) = &self.grade_scale {
            scale
                .validate()
                .map_err(|e| ApiError::ConfigError(format!("grading.grade_scale: {}", e)))?;
        }
        Ok(())
    }
}
