//! Property tests: structural invariants under random edit sequences.

use gradetree::aggregate::{total_score, weighted_score, ScoreSheet};
use gradetree::records::CourseConfigRecord;
use gradetree::tree::{ComponentSet, GradingTree, NodeUpdate};
use gradetree::types::{ComponentPath, Direction};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone)]
enum Op {
    Add { parent: usize, weight: u8 },
    Remove { parent: usize, child: usize },
    Update { node: usize, weight: u8 },
    Move { parent: usize, index: usize, up: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), 0u8..50).prop_map(|(parent, weight)| Op::Add { parent, weight }),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(parent, child)| Op::Remove { parent, child }),
        1 => (any::<usize>(), 0u8..50).prop_map(|(node, weight)| Op::Update { node, weight }),
        2 => (any::<usize>(), 0usize..6, any::<bool>())
            .prop_map(|(parent, index, up)| Op::Move { parent, index, up }),
    ]
}

/// Root plus every component path, so any index addresses an existing parent.
fn parent_candidates(tree: &GradingTree) -> Vec<ComponentPath> {
    let mut paths = vec![ComponentPath::root()];
    paths.extend(tree.walk().into_iter().map(|entry| entry.path));
    paths
}

fn apply(tree: &mut GradingTree, op: &Op) {
    let parents = parent_candidates(tree);
    match op {
        Op::Add { parent, weight } => {
            let parent = &parents[parent % parents.len()];
            tree.add_child_with(parent, "Component", f64::from(*weight))
                .unwrap();
        }
        Op::Remove { parent, child } => {
            let parent = &parents[parent % parents.len()];
            let order = tree.children_at(parent).unwrap().order().to_vec();
            if order.is_empty() {
                return;
            }
            let key = order[child % order.len()].clone();
            tree.remove_child(parent, &key).unwrap();
        }
        Op::Update { node, weight } => {
            if parents.len() == 1 {
                return;
            }
            let path = &parents[1 + node % (parents.len() - 1)];
            tree.update_node(path, NodeUpdate::weight(f64::from(*weight)))
                .unwrap();
        }
        Op::Move { parent, index, up } => {
            let parent = &parents[parent % parents.len()];
            let direction = if *up { Direction::Up } else { Direction::Down };
            tree.move_sibling(parent, *index, direction).unwrap();
        }
    }
}

fn assert_order_is_permutation(set: &ComponentSet) -> Result<(), TestCaseError> {
    let order = set.order();
    prop_assert_eq!(order.len(), set.len());
    let unique: HashSet<&String> = order.iter().collect();
    prop_assert_eq!(unique.len(), order.len());
    for key in order {
        prop_assert!(set.contains_key(key));
        prop_assert!(!key.contains('.'));
        assert_order_is_permutation(set.get(key).unwrap().children())?;
    }
    Ok(())
}

/// Full score on every leaf.
fn full_marks(tree: &GradingTree) -> ScoreSheet {
    tree.leaf_paths()
        .into_iter()
        .map(|path| {
            let weight = tree.resolve(&path).unwrap().weight;
            (path.full_key(), weight)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn order_is_always_a_permutation_of_keys(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut tree = GradingTree::new();
        for op in &ops {
            apply(&mut tree, op);
            assert_order_is_permutation(tree.components())?;
        }
    }

    #[test]
    fn records_round_trip_after_any_edits(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let mut tree = GradingTree::new();
        for op in &ops {
            apply(&mut tree, op);
        }
        let record = CourseConfigRecord::from_tree(&tree, BTreeMap::new());
        let json = serde_json::to_string(&record).unwrap();
        let parsed: CourseConfigRecord = serde_json::from_str(&json).unwrap();
        let loaded = parsed.to_tree().unwrap();
        prop_assert!(!loaded.repaired);
        prop_assert_eq!(loaded.tree, tree);
    }

    #[test]
    fn full_marks_earn_every_scorable_weight(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let mut tree = GradingTree::new();
        for op in &ops {
            apply(&mut tree, op);
        }
        let scores = full_marks(&tree);
        for entry in tree.walk() {
            let score = weighted_score(entry.component, &scores, &entry.path.full_key());
            if entry.component.raw_max_points() > 0.0 || entry.component.is_leaf() {
                prop_assert!((score - entry.component.weight).abs() < 1e-9);
            } else {
                prop_assert_eq!(score, 0.0);
            }
        }
    }

    #[test]
    fn total_never_exceeds_weight_for_in_range_scores(
        ops in prop::collection::vec(op_strategy(), 0..30),
        fraction in 0.0f64..=1.0,
    ) {
        let mut tree = GradingTree::new();
        for op in &ops {
            apply(&mut tree, op);
        }
        let scores: ScoreSheet = full_marks(&tree)
            .iter()
            .map(|(key, max)| (key.clone(), max * fraction))
            .collect();
        let total = total_score(&tree, &scores);
        prop_assert!(total >= 0.0);
        prop_assert!(total <= tree.total_weight() + 1e-9);
    }
}
