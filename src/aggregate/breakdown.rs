//! Per-component score breakdown for one student.

use super::grade::GradeScale;
use super::scores::ScoreSource;
use super::{total_score, weighted_score};
use crate::tree::GradingTree;
use serde::Serialize;

/// One row of a student's score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreLine {
    pub full_key: String,
    pub label: String,
    pub depth: usize,
    pub is_leaf: bool,
    /// Weighted contribution to the parent, on the scale of `max`.
    pub score: f64,
    /// The component's weight.
    pub max: f64,
}

/// Every component in pre-order with its weighted score.
pub fn score_breakdown<S: ScoreSource + ?Sized>(tree: &GradingTree, scores: &S) -> Vec<ScoreLine> {
    tree.walk()
        .into_iter()
        .map(|entry| {
            let full_key = entry.path.full_key();
            let score = weighted_score(entry.component, scores, &full_key);
            ScoreLine {
                full_key,
                label: entry.component.label.clone(),
                depth: entry.depth,
                is_leaf: entry.component.is_leaf(),
                score,
                max: entry.component.weight,
            }
        })
        .collect()
}

/// A student's breakdown, total and grade for one course.
#[derive(Debug, Clone, Serialize)]
pub struct StudentReport {
    pub student_id: String,
    pub course: String,
    pub lines: Vec<ScoreLine>,
    pub total: f64,
    pub max_total: f64,
    pub percentage: f64,
    pub grade: f64,
}

impl StudentReport {
    pub fn build<S: ScoreSource + ?Sized>(
        student_id: impl Into<String>,
        course: impl Into<String>,
        tree: &GradingTree,
        scores: &S,
        scale: &GradeScale,
    ) -> Self {
        let total = total_score(tree, scores);
        let max_total = tree.total_weight();
        let percentage = if max_total > 0.0 {
            (total / max_total) * 100.0
        } else {
            0.0
        };
        Self {
            student_id: student_id.into(),
            course: course.into(),
            lines: score_breakdown(tree, scores),
            total,
            max_total,
            percentage,
            grade: scale.grade_for(total),
        }
    }
}
