//! Component key generation and validation

use super::node::ComponentSet;
use crate::error::TreeError;
use crate::types::{ComponentKey, KEY_SEPARATOR};

/// Prefix of keys generated for components added by an editor.
pub const GENERATED_KEY_PREFIX: &str = "custom_";

/// Generate a key unique within `siblings`.
///
/// Keys are `custom_<unix millis>`; when that key is already taken (several
/// components added within one millisecond) a `_<n>` suffix is appended.
pub fn generate_key(siblings: &ComponentSet) -> ComponentKey {
    let base = format!(
        "{}{}",
        GENERATED_KEY_PREFIX,
        chrono::Utc::now().timestamp_millis()
    );
    if !siblings.contains_key(&base) {
        return base;
    }
    let mut suffix: u64 = 1;
    loop {
        let candidate = format!("{}_{}", base, suffix);
        if !siblings.contains_key(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Check that a caller-supplied key can be addressed by a full key.
pub fn validate_key(key: &str) -> Result<(), TreeError> {
    if key.is_empty() || key.contains(KEY_SEPARATOR) {
        return Err(TreeError::InvalidKey {
            key: key.to_string(),
        });
    }
    Ok(())
}
