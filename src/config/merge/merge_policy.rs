//! Built-in defaults, the lowest layer of every merge.

use crate::config::GradingSettings;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let grading = GradingSettings::default();
    Config::builder()
        .set_default("grading.default_weight", grading.default_weight)?
        .set_default("grading.pass_mark", grading.pass_mark)?
        .set_default("grading.require_full_weight", grading.require_full_weight)
}
