//! Grading Tree
//!
//! The recursive grading rubric: an ordered set of top-level components, each
//! optionally decomposed into ordered sub-components to any depth. Structural
//! edits address their target by `ComponentPath` and either succeed completely
//! or return a `TreeError` with the tree unchanged.

pub mod keys;
pub mod node;
pub mod walk;

pub use node::{ComponentSet, GradingComponent};
pub use walk::WalkEntry;

use crate::error::TreeError;
use crate::types::{ComponentKey, ComponentPath, Direction};
use tracing::debug;

/// Weight given to components created by `add_child`.
pub const DEFAULT_CHILD_WEIGHT: f64 = 10.0;

/// Partial update of a component's own fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub label: Option<String>,
    pub weight: Option<f64>,
}

impl NodeUpdate {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            weight: None,
        }
    }

    pub fn weight(weight: f64) -> Self {
        Self {
            label: None,
            weight: Some(weight),
        }
    }
}

/// Rooted, ordered, labeled tree of weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradingTree {
    components: ComponentSet,
}

impl GradingTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: ComponentSet) -> Self {
        Self { components }
    }

    /// Builder-style top-level insertion, appended after existing components.
    pub fn with_component(mut self, key: impl Into<ComponentKey>, component: GradingComponent) -> Self {
        self.components.insert(key.into(), component);
        self
    }

    /// Top-level components in order.
    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Look up the component at `path`.
    pub fn resolve(&self, path: &ComponentPath) -> Result<&GradingComponent, TreeError> {
        let mut set = &self.components;
        let mut found = None;
        for key in path.segments() {
            let component = set
                .get(key)
                .ok_or_else(|| TreeError::invalid_path(path.full_key()))?;
            set = component.children();
            found = Some(component);
        }
        found.ok_or_else(|| TreeError::invalid_path(path.full_key()))
    }

    fn resolve_mut(&mut self, path: &ComponentPath) -> Result<&mut GradingComponent, TreeError> {
        let (first, rest) = path
            .segments()
            .split_first()
            .ok_or_else(|| TreeError::invalid_path(path.full_key()))?;
        let mut node = self
            .components
            .get_mut(first)
            .ok_or_else(|| TreeError::invalid_path(path.full_key()))?;
        for key in rest {
            node = node
                .children
                .get_mut(key)
                .ok_or_else(|| TreeError::invalid_path(path.full_key()))?;
        }
        Ok(node)
    }

    /// Child set addressed by a parent path; the root path is the top level.
    pub fn children_at(&self, path: &ComponentPath) -> Result<&ComponentSet, TreeError> {
        if path.is_root() {
            return Ok(&self.components);
        }
        Ok(self.resolve(path)?.children())
    }

    fn children_at_mut(&mut self, path: &ComponentPath) -> Result<&mut ComponentSet, TreeError> {
        if path.is_root() {
            return Ok(&mut self.components);
        }
        Ok(&mut self.resolve_mut(path)?.children)
    }

    /// Add an unlabeled child of default weight under `path`.
    pub fn add_child(&mut self, path: &ComponentPath) -> Result<ComponentKey, TreeError> {
        self.add_child_with(path, "", DEFAULT_CHILD_WEIGHT)
    }

    /// Add a child under `path` with a freshly generated key, returned on success.
    pub fn add_child_with(
        &mut self,
        path: &ComponentPath,
        label: impl Into<String>,
        weight: f64,
    ) -> Result<ComponentKey, TreeError> {
        let siblings = self.children_at_mut(path)?;
        let key = keys::generate_key(siblings);
        siblings.insert(key.clone(), GradingComponent::new(label, weight));
        debug!(parent = %path, key = %key, weight, "Added grading component");
        Ok(key)
    }

    /// Insert a component under a caller-chosen key, replacing any existing one.
    pub fn insert_component(
        &mut self,
        path: &ComponentPath,
        key: impl Into<ComponentKey>,
        component: GradingComponent,
    ) -> Result<Option<GradingComponent>, TreeError> {
        let key = key.into();
        keys::validate_key(&key)?;
        let siblings = self.children_at_mut(path)?;
        Ok(siblings.insert(key, component))
    }

    /// Remove `key` and its entire subtree from the parent at `path`.
    pub fn remove_child(
        &mut self,
        path: &ComponentPath,
        key: &str,
    ) -> Result<GradingComponent, TreeError> {
        let siblings = self.children_at_mut(path)?;
        let removed = siblings
            .remove(key)
            .ok_or_else(|| TreeError::key_not_found(path.to_string(), key))?;
        debug!(parent = %path, key, "Removed grading component");
        Ok(removed)
    }

    /// Apply a partial label/weight update to the component at `path`.
    pub fn update_node(&mut self, path: &ComponentPath, update: NodeUpdate) -> Result<(), TreeError> {
        let node = self.resolve_mut(path)?;
        if let Some(label) = update.label {
            node.label = label;
        }
        if let Some(weight) = update.weight {
            node.weight = weight;
        }
        Ok(())
    }

    /// Swap the sibling at `index` under `path` with its neighbour.
    ///
    /// Returns whether anything moved; an out-of-bounds move is a no-op.
    pub fn move_sibling(
        &mut self,
        path: &ComponentPath,
        index: usize,
        direction: Direction,
    ) -> Result<bool, TreeError> {
        let siblings = self.children_at_mut(path)?;
        Ok(siblings.swap(index, direction))
    }

    /// Replace the order under `path` with a permutation of the same keys.
    pub(crate) fn reorder(
        &mut self,
        path: &ComponentPath,
        order: Vec<ComponentKey>,
    ) -> Result<bool, TreeError> {
        Ok(self.children_at_mut(path)?.reorder(order))
    }

    /// Raw maximum points: sum of leaf weights under `path`.
    ///
    /// The root path sums over every top-level component.
    pub fn raw_max_points(&self, path: &ComponentPath) -> Result<f64, TreeError> {
        if path.is_root() {
            return Ok(self
                .components
                .iter()
                .map(|(_, component)| component.raw_max_points())
                .sum());
        }
        Ok(self.resolve(path)?.raw_max_points())
    }

    /// Sum of top-level weights; meaningful grades expect exactly 100.
    pub fn total_weight(&self) -> f64 {
        self.components
            .iter()
            .map(|(_, component)| component.weight)
            .sum()
    }

    /// Every component in pre-order with its path and depth.
    pub fn walk(&self) -> Vec<WalkEntry<'_>> {
        walk::walk_set(&self.components, &ComponentPath::root())
    }

    /// Paths of every leaf, in order.
    pub fn leaf_paths(&self) -> Vec<ComponentPath> {
        self.walk()
            .into_iter()
            .filter(|entry| entry.component.is_leaf())
            .map(|entry| entry.path)
            .collect()
    }
}
