//! Depth-first traversal of a grading tree.

use super::node::{ComponentSet, GradingComponent};
use crate::types::ComponentPath;

/// One visited component, in pre-order.
#[derive(Debug, Clone)]
pub struct WalkEntry<'a> {
    pub path: ComponentPath,
    /// Zero for top-level components.
    pub depth: usize,
    pub component: &'a GradingComponent,
}

/// Visit every component under `set` in order, parents before children.
pub fn walk_set<'a>(set: &'a ComponentSet, base: &ComponentPath) -> Vec<WalkEntry<'a>> {
    let mut out = Vec::new();
    collect(set, base, base.len(), &mut out);
    out
}

fn collect<'a>(
    set: &'a ComponentSet,
    parent: &ComponentPath,
    depth: usize,
    out: &mut Vec<WalkEntry<'a>>,
) {
    for (key, component) in set.iter() {
        let path = parent.child(key.clone());
        out.push(WalkEntry {
            path: path.clone(),
            depth,
            component,
        });
        collect(component.children(), &path, depth + 1, out);
    }
}
