//! Course rubric policy
//!
//! Conventions of the surrounding application rather than engine rules: the
//! three reserved top-level components every course carries, their default
//! weights, and the order they are presented in.

use crate::error::TreeError;
use crate::tree::{GradingComponent, GradingTree};
use crate::types::{ComponentKey, ComponentPath};

/// Reserved top-level keys with default label and weight, in presentation order.
pub const RESERVED_COMPONENTS: [(&str, &str, f64); 3] = [
    ("psychomotor", "Psychomotor", 20.0),
    ("midterm", "Midterm", 40.0),
    ("final", "Final", 40.0),
];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_COMPONENTS.iter().any(|(k, _, _)| *k == key)
}

/// Whether an editor may rename the component at `path`.
///
/// Reserved top-level components keep their label; their weight stays editable.
pub fn label_is_fixed(path: &ComponentPath) -> bool {
    match path.segments() {
        [key] => is_reserved(key),
        _ => false,
    }
}

/// A tree holding only the reserved components with their defaults.
pub fn default_tree() -> GradingTree {
    RESERVED_COMPONENTS
        .iter()
        .fold(GradingTree::new(), |tree, (key, label, weight)| {
            tree.with_component(*key, GradingComponent::new(*label, *weight))
        })
}

/// Insert every missing reserved component; returns the keys added.
pub fn seed_defaults(tree: &mut GradingTree) -> Result<Vec<ComponentKey>, TreeError> {
    let root = ComponentPath::root();
    let mut added = Vec::new();
    for (key, label, weight) in RESERVED_COMPONENTS {
        if tree.components().contains_key(key) {
            continue;
        }
        tree.insert_component(&root, key, GradingComponent::new(label, weight))?;
        added.push(key.to_string());
    }
    Ok(added)
}

/// Present reserved components first (keeping their relative order), then the rest.
pub fn reserved_first(order: &[ComponentKey]) -> Vec<ComponentKey> {
    let (mut reserved, others): (Vec<ComponentKey>, Vec<ComponentKey>) =
        order.iter().cloned().partition(|key| is_reserved(key));
    reserved.extend(others);
    reserved
}

/// Seed reserved components and move them to the front of the top-level order.
///
/// Returns the reserved keys that had to be seeded.
pub fn normalize_tree(tree: &mut GradingTree) -> Result<Vec<ComponentKey>, TreeError> {
    let added = seed_defaults(tree)?;
    let order = reserved_first(tree.components().order());
    tree.reorder(&ComponentPath::root(), order)?;
    Ok(added)
}
