//! Environment variable source: GRADETREE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use std::collections::HashMap;

pub const ENV_PREFIX: &str = "GRADETREE";

/// Add environment variable overlay to builder.
/// Uses GRADETREE_ prefix and __ as separator for nested keys.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(source(None)))
}

/// The environment source; `vars` replaces the process environment when given.
pub(crate) fn source(vars: Option<HashMap<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .source(vars.map(|vars| vars.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::merge::merge_policy;
    use crate::config::sources::explicit_file;
    use crate::config::GradetreeConfig;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn nested_keys_override_the_file_layer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gradetree.toml");
        fs::write(&path, "[storage]\ndata_dir = \"/from/file\"\n").unwrap();

        let builder = merge_policy::builder_with_defaults().unwrap();
        let builder = explicit_file::add_to_builder(builder, &path).unwrap();
        let config: GradetreeConfig = builder
            .add_source(source(Some(vars(&[
                ("GRADETREE__STORAGE__DATA_DIR", "/from/env"),
                ("GRADETREE__GRADING__PASS_MARK", "45"),
                ("OTHER__GRADING__PASS_MARK", "99"),
            ]))))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/from/env")));
        assert_eq!(config.grading.pass_mark, 45.0);
    }
}
