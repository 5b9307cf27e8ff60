//! Grading component node types and the ordered child set.

use crate::types::{ComponentKey, Direction};
use std::collections::HashMap;

/// Ordered, keyed collection of grading components.
///
/// `order` is always a permutation of the key set of `entries`: every mutation
/// updates both together, so there are no orphaned or missing keys and no
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSet {
    entries: HashMap<ComponentKey, GradingComponent>,
    order: Vec<ComponentKey>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a keyed map and a possibly inconsistent order.
    ///
    /// Order keys without an entry and repeated keys are dropped; entries
    /// missing from the order are appended in the iteration order of
    /// `entries`. The flag is true when any repair was needed.
    pub fn from_parts<I>(entries: I, order: &[ComponentKey]) -> (Self, bool)
    where
        I: IntoIterator<Item = (ComponentKey, GradingComponent)>,
    {
        let mut pending: Vec<(ComponentKey, GradingComponent)> = entries.into_iter().collect();
        let mut set = ComponentSet::new();
        let mut repaired = false;

        for key in order {
            match pending.iter().position(|(k, _)| k == key) {
                Some(idx) => {
                    let (key, component) = pending.remove(idx);
                    set.insert(key, component);
                }
                None => repaired = true,
            }
        }
        if !pending.is_empty() {
            repaired = true;
        }
        for (key, component) in pending {
            set.insert(key, component);
        }

        (set, repaired)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&GradingComponent> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut GradingComponent> {
        self.entries.get_mut(key)
    }

    /// Keys in display and aggregation order.
    pub fn order(&self) -> &[ComponentKey] {
        &self.order
    }

    /// Iterate `(key, component)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentKey, &GradingComponent)> {
        self.order
            .iter()
            .filter_map(move |key| self.entries.get(key).map(|component| (key, component)))
    }

    /// Insert or replace a component.
    ///
    /// A new key is appended to the order; replacing keeps the existing
    /// position and returns the previous component.
    pub(crate) fn insert(
        &mut self,
        key: ComponentKey,
        component: GradingComponent,
    ) -> Option<GradingComponent> {
        let previous = self.entries.insert(key.clone(), component);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<GradingComponent> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Swap the entry at `index` with its neighbour in `direction`.
    ///
    /// Returns false, leaving the order untouched, when either position falls
    /// outside the order.
    pub(crate) fn swap(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        match target {
            Some(target) if index < self.order.len() && target < self.order.len() => {
                self.order.swap(index, target);
                true
            }
            _ => false,
        }
    }

    /// Reorder to match `order` exactly; `order` must be a permutation of the keys.
    pub(crate) fn reorder(&mut self, order: Vec<ComponentKey>) -> bool {
        let mut sorted_new = order.clone();
        sorted_new.sort();
        let mut sorted_current = self.order.clone();
        sorted_current.sort();
        if sorted_new != sorted_current {
            return false;
        }
        self.order = order;
        true
    }
}

/// A node of the grading rubric.
///
/// A leaf (no children) is scored directly against its own `weight`. An
/// internal node's value is always derived from the leaves beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingComponent {
    pub label: String,
    /// Points this component contributes to its parent's total.
    pub weight: f64,
    pub(super) children: ComponentSet,
}

impl GradingComponent {
    /// Create a leaf component.
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
            children: ComponentSet::new(),
        }
    }

    /// Builder-style child insertion, appended after existing children.
    pub fn with_child(mut self, key: impl Into<ComponentKey>, child: GradingComponent) -> Self {
        self.children.insert(key.into(), child);
        self
    }

    pub(crate) fn with_children(mut self, children: ComponentSet) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &ComponentSet {
        &self.children
    }

    /// Sum of leaf weights beneath this node; a leaf returns its own weight.
    pub fn raw_max_points(&self) -> f64 {
        if self.is_leaf() {
            return self.weight;
        }
        self.children
            .iter()
            .map(|(_, child)| child.raw_max_points())
            .sum()
    }
}
