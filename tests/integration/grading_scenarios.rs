//! End-to-end grading scenarios through the public API.

use gradetree::aggregate::{
    letter_grade, score_at, score_breakdown, summarize_class, total_score, GradeScale, ScoreSheet,
};
use gradetree::policy::default_tree;
use gradetree::tree::{GradingComponent, GradingTree};
use gradetree::types::ComponentPath;

fn sheet(entries: &[(&str, f64)]) -> ScoreSheet {
    entries.iter().map(|&(key, value)| (key, value)).collect()
}

fn nested_tree() -> GradingTree {
    GradingTree::new()
        .with_component("psychomotor", GradingComponent::new("Psychomotor", 20.0))
        .with_component("midterm", GradingComponent::new("Midterm", 40.0))
        .with_component(
            "final",
            GradingComponent::new("Final", 40.0)
                .with_child("project", GradingComponent::new("Project", 30.0))
                .with_child("exam", GradingComponent::new("Exam", 10.0)),
        )
}

#[test]
fn flat_course_totals_and_grades() {
    let scores = sheet(&[("midterm", 30.0), ("final", 35.0), ("psychomotor", 18.0)]);
    let total = total_score(&default_tree(), &scores);
    assert_eq!(total, 83.0);
    assert_eq!(letter_grade(total), 4.0);
}

#[test]
fn nested_final_is_rescaled_once() {
    let tree = nested_tree();
    let scores = sheet(&[
        ("final.project", 20.0),
        ("final.exam", 5.0),
        ("midterm", 30.0),
        ("psychomotor", 15.0),
    ]);

    let final_score = score_at(&tree, &ComponentPath::from(["final"]), &scores).unwrap();
    assert_eq!(final_score, 25.0);
    let total = total_score(&tree, &scores);
    assert_eq!(total, 70.0);
    assert_eq!(letter_grade(total), 3.0);
}

#[test]
fn deep_levels_are_expanded_not_rescaled() {
    // final (40) -> project (30), exam (10) -> {written 6, oral 2}
    let tree = GradingTree::new().with_component(
        "final",
        GradingComponent::new("Final", 40.0)
            .with_child("project", GradingComponent::new("Project", 30.0))
            .with_child(
                "exam",
                GradingComponent::new("Exam", 10.0)
                    .with_child("written", GradingComponent::new("Written", 6.0))
                    .with_child("oral", GradingComponent::new("Oral", 2.0)),
            ),
    );
    let scores = sheet(&[
        ("final.project", 15.0),
        ("final.exam.written", 3.0),
        ("final.exam.oral", 2.0),
    ]);

    // raw sum 20 over raw max 38, scaled onto 40
    let expected = (20.0 / 38.0) * 40.0;
    assert!((total_score(&tree, &scores) - expected).abs() < 1e-9);

    let lines = score_breakdown(&tree, &scores);
    let exam = lines.iter().find(|l| l.full_key == "final.exam").unwrap();
    assert!((exam.score - (5.0 / 8.0) * 10.0).abs() < 1e-9);
    assert_eq!(exam.depth, 1);
}

#[test]
fn scores_on_internal_nodes_do_not_count() {
    let tree = nested_tree();
    let with_internal = sheet(&[("final", 40.0), ("final.project", 30.0)]);
    let without = sheet(&[("final.project", 30.0)]);
    assert_eq!(
        total_score(&tree, &with_internal),
        total_score(&tree, &without)
    );
}

#[test]
fn class_summary_over_mixed_students() {
    let tree = default_tree();
    let students = vec![
        (
            "6501".to_string(),
            sheet(&[("midterm", 30.0), ("final", 35.0), ("psychomotor", 18.0)]),
        ),
        ("6502".to_string(), sheet(&[("midterm", 20.0), ("final", 10.0)])),
        ("6503".to_string(), sheet(&[("midterm", 35.0), ("final", 30.0)])),
        ("6504".to_string(), ScoreSheet::new()),
    ];

    let summary = summarize_class(&tree, &students, &GradeScale::default(), 50.0);
    assert_eq!(summary.results.len(), 4);
    assert_eq!(summary.average, (83.0 + 30.0 + 65.0 + 0.0) / 4.0);
    assert_eq!(summary.passing_count, 2);

    let at_risk: Vec<&str> = summary
        .at_risk
        .iter()
        .map(|r| r.student_id.as_str())
        .collect();
    assert_eq!(at_risk, vec!["6504", "6502"]);

    assert_eq!(summary.distribution["4.0"], 1);
    assert_eq!(summary.distribution["2.5"], 1);
    assert_eq!(summary.distribution["0.0"], 2);
    assert_eq!(summary.distribution["3.5"], 0);
    assert_eq!(summary.distribution.values().sum::<usize>(), 4);
}
