//! Score Aggregation
//!
//! Turns raw leaf scores into weighted totals. A leaf contributes its raw
//! score. An internal node sums the raw scores of every leaf in its subtree,
//! divides by the subtree's raw maximum and scales the ratio onto its own
//! weight; levels between the node and its leaves are expanded, never rescaled
//! on their own. The tree total is the sum over top-level components.
//!
//! Aggregation is total: missing or malformed scores count as 0 and a subtree
//! without leaf weight contributes 0.

pub mod breakdown;
pub mod class;
pub mod grade;
pub mod scores;

pub use breakdown::{score_breakdown, ScoreLine, StudentReport};
pub use class::{summarize_class, ClassSummary, StudentResult};
pub use grade::{format_grade, letter_grade, GradeScale, GradeStep};
pub use scores::{coerce_score, leaf_score, ScoreSheet, ScoreSource};

use crate::error::TreeError;
use crate::tree::{GradingComponent, GradingTree};
use crate::types::{ComponentPath, KEY_SEPARATOR};

fn child_key(parent: &str, key: &str) -> String {
    format!("{}{}{}", parent, KEY_SEPARATOR, key)
}

/// Weighted contribution of `node`, addressed by `full_key`, to its parent.
pub fn weighted_score<S: ScoreSource + ?Sized>(
    node: &GradingComponent,
    scores: &S,
    full_key: &str,
) -> f64 {
    if node.is_leaf() {
        return leaf_score(scores, full_key);
    }
    let raw_max = node.raw_max_points();
    if raw_max == 0.0 || !raw_max.is_finite() {
        return 0.0;
    }
    let scaled = (raw_leaf_sum(node, scores, full_key) / raw_max) * node.weight;
    if scaled.is_finite() {
        scaled
    } else {
        0.0
    }
}

/// Unscaled sum of the raw scores of every leaf under `node`.
pub fn raw_leaf_sum<S: ScoreSource + ?Sized>(
    node: &GradingComponent,
    scores: &S,
    full_key: &str,
) -> f64 {
    if node.is_leaf() {
        return leaf_score(scores, full_key);
    }
    node.children()
        .iter()
        .map(|(key, child)| raw_leaf_sum(child, scores, &child_key(full_key, key)))
        .sum()
}

/// Weighted score of the component at `path`.
pub fn score_at<S: ScoreSource + ?Sized>(
    tree: &GradingTree,
    path: &ComponentPath,
    scores: &S,
) -> Result<f64, TreeError> {
    let node = tree.resolve(path)?;
    Ok(weighted_score(node, scores, &path.full_key()))
}

/// Weighted total of the whole tree, on the scale of `tree.total_weight()`.
pub fn total_score<S: ScoreSource + ?Sized>(tree: &GradingTree, scores: &S) -> f64 {
    tree.components()
        .iter()
        .map(|(key, component)| weighted_score(component, scores, key))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_tree() -> GradingTree {
        GradingTree::new()
            .with_component("midterm", GradingComponent::new("Midterm", 40.0))
            .with_component("final", GradingComponent::new("Final", 40.0))
            .with_component("psychomotor", GradingComponent::new("Psychomotor", 20.0))
    }

    fn nested_tree() -> GradingTree {
        GradingTree::new()
            .with_component("midterm", GradingComponent::new("Midterm", 40.0))
            .with_component(
                "final",
                GradingComponent::new("Final", 40.0)
                    .with_child("project", GradingComponent::new("Project", 30.0))
                    .with_child("exam", GradingComponent::new("Exam", 10.0)),
            )
            .with_component("psychomotor", GradingComponent::new("Psychomotor", 20.0))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_leaf_total_equals_raw_score() {
        let tree = GradingTree::new().with_component("exam", GradingComponent::new("Exam", 100.0));
        let scores: ScoreSheet = [("exam", 73.0)].into_iter().collect();
        assert_eq!(score_at(&tree, &ComponentPath::from(["exam"]), &scores).unwrap(), 73.0);
        assert_eq!(total_score(&tree, &scores), 73.0);
    }

    #[test]
    fn internal_node_rescales_raw_ratio_onto_weight() {
        let node = GradingComponent::new("Homework", 30.0)
            .with_child("a", GradingComponent::new("A", 10.0))
            .with_child("b", GradingComponent::new("B", 20.0));
        let scores: ScoreSheet = [("hw.a", 5.0), ("hw.b", 15.0)].into_iter().collect();
        assert!(approx(weighted_score(&node, &scores, "hw"), (20.0 / 30.0) * 30.0));
    }

    #[test]
    fn zero_raw_max_contributes_zero() {
        let node = GradingComponent::new("Bonus", 10.0)
            .with_child("a", GradingComponent::new("A", 0.0))
            .with_child("b", GradingComponent::new("B", 0.0));
        let scores: ScoreSheet = [("bonus.a", 5.0)].into_iter().collect();
        let score = weighted_score(&node, &scores, "bonus");
        assert_eq!(score, 0.0);
        assert!(!score.is_nan());
    }

    #[test]
    fn deep_subtrees_rescale_once_at_the_scored_node() {
        // exam's own weight (999) must not be used; only leaf weights matter below final.
        let node = GradingComponent::new("Final", 40.0)
            .with_child("project", GradingComponent::new("Project", 30.0))
            .with_child(
                "exam",
                GradingComponent::new("Exam", 999.0)
                    .with_child("written", GradingComponent::new("Written", 6.0))
                    .with_child("oral", GradingComponent::new("Oral", 4.0)),
            );
        let scores: ScoreSheet = [
            ("final.project", 20.0),
            ("final.exam.written", 3.0),
            ("final.exam.oral", 2.0),
        ]
        .into_iter()
        .collect();
        assert!(approx(weighted_score(&node, &scores, "final"), (25.0 / 40.0) * 40.0));
        assert_eq!(raw_leaf_sum(&node, &scores, "final"), 25.0);
    }

    #[test]
    fn scores_on_internal_nodes_are_ignored() {
        let tree = nested_tree();
        let scores: ScoreSheet = [("final", 40.0), ("final.project", 30.0)].into_iter().collect();
        let final_score = score_at(&tree, &ComponentPath::from(["final"]), &scores).unwrap();
        assert!(approx(final_score, 30.0));
    }

    #[test]
    fn flat_end_to_end_scenario() {
        let scores: ScoreSheet = [("midterm", 30.0), ("final", 35.0), ("psychomotor", 18.0)]
            .into_iter()
            .collect();
        let total = total_score(&flat_tree(), &scores);
        assert_eq!(total, 83.0);
        assert_eq!(letter_grade(total), 4.0);
    }

    #[test]
    fn nested_end_to_end_scenario() {
        let tree = nested_tree();
        let scores: ScoreSheet = [
            ("midterm", 30.0),
            ("final.project", 20.0),
            ("final.exam", 5.0),
            ("psychomotor", 15.0),
        ]
        .into_iter()
        .collect();

        let final_score = score_at(&tree, &ComponentPath::from(["final"]), &scores).unwrap();
        assert!(approx(final_score, 25.0));
        let total = total_score(&tree, &scores);
        assert!(approx(total, 70.0));
        assert_eq!(letter_grade(total), 3.0);
    }

    #[test]
    fn missing_scores_count_as_zero() {
        let total = total_score(&nested_tree(), &ScoreSheet::new());
        assert_eq!(total, 0.0);
    }

    #[test]
    fn score_at_reports_invalid_path() {
        let err = score_at(&nested_tree(), &ComponentPath::from(["lab"]), &ScoreSheet::new());
        assert!(matches!(err, Err(TreeError::InvalidPath { .. })));
    }
}
