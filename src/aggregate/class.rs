//! Class-wide totals, grade distribution and at-risk list.

use super::grade::{format_grade, GradeScale};
use super::scores::ScoreSheet;
use super::total_score;
use crate::tree::GradingTree;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Total and grade of one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentResult {
    pub student_id: String,
    pub total: f64,
    pub grade: f64,
}

/// Aggregate view of a course's students.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary {
    /// One entry per input student, in input order.
    pub results: Vec<StudentResult>,
    pub average: f64,
    /// Student count per grade point, keyed by display form (`"3.5"`).
    pub distribution: BTreeMap<String, usize>,
    /// Students below the pass mark, lowest total first.
    pub at_risk: Vec<StudentResult>,
    pub passing_count: usize,
}

/// Summarize a class. Students are scored in parallel.
///
/// Each entry pairs a student id with that student's score sheet; students
/// without recorded scores should be passed an empty sheet.
pub fn summarize_class(
    tree: &GradingTree,
    students: &[(String, ScoreSheet)],
    scale: &GradeScale,
    pass_mark: f64,
) -> ClassSummary {
    let results: Vec<StudentResult> = students
        .par_iter()
        .map(|(student_id, scores)| {
            let total = total_score(tree, scores);
            StudentResult {
                student_id: student_id.clone(),
                total,
                grade: scale.grade_for(total),
            }
        })
        .collect();

    let average = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.total).sum::<f64>() / results.len() as f64
    };

    let mut distribution: BTreeMap<String, usize> = scale
        .grade_points()
        .into_iter()
        .map(|grade| (format_grade(grade), 0))
        .collect();
    for result in &results {
        *distribution.entry(format_grade(result.grade)).or_insert(0) += 1;
    }

    let mut at_risk: Vec<StudentResult> = results
        .iter()
        .filter(|r| r.total < pass_mark)
        .cloned()
        .collect();
    at_risk.sort_by(|a, b| a.total.total_cmp(&b.total));

    let passing_count = results.iter().filter(|r| r.total >= pass_mark).count();

    ClassSummary {
        results,
        average,
        distribution,
        at_risk,
        passing_count,
    }
}
