//! Gradebook over the JSON document store.

use gradetree::aggregate::ScoreSheet;
use gradetree::config::GradingSettings;
use gradetree::error::ApiError;
use gradetree::gradebook::Gradebook;
use gradetree::store::{CourseStore, JsonFileStore};
use gradetree::tree::NodeUpdate;
use gradetree::types::ComponentPath;
use std::fs;
use tempfile::TempDir;

fn gradebook(dir: &TempDir) -> Gradebook<JsonFileStore> {
    Gradebook::new(JsonFileStore::new(dir.path()), GradingSettings::default())
}

#[test]
fn nested_rubric_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let final_path = ComponentPath::from(["final"]);
    let expected = {
        let book = gradebook(&dir);
        let mut editor = book.open_course("Leadership").unwrap();
        let project = editor
            .add_labeled_component(&final_path, "Project", Some(30.0))
            .unwrap();
        let exam = editor
            .add_labeled_component(&final_path, "Exam", Some(10.0))
            .unwrap();
        editor
            .add_labeled_component(&final_path.child(exam.clone()), "Written", Some(10.0))
            .unwrap();
        editor
            .update_component(&final_path.child(project), NodeUpdate::label("Group project"))
            .unwrap();
        book.save_course(&editor).unwrap();
        editor.tree().clone()
    };

    let book = gradebook(&dir);
    let reopened = book.open_course("Leadership").unwrap();
    assert_eq!(reopened.tree(), &expected);
    assert!(!reopened.was_repaired());
}

#[test]
fn documents_use_the_portal_wire_format() {
    let dir = TempDir::new().unwrap();
    let book = gradebook(&dir);
    let editor = book.open_course("Leadership").unwrap();
    book.save_course(&editor).unwrap();
    book.record_score("Leadership", "6501", "midterm", 31.5)
        .unwrap();

    let course: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("courses/Leadership.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        course["gradingConfigOrder"],
        serde_json::json!(["psychomotor", "midterm", "final"])
    );
    assert_eq!(course["gradingConfig"]["psychomotor"]["max"], serde_json::json!(20.0));

    let score: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("scores/Leadership/6501.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(score["studentId"], "6501");
    assert_eq!(score["course"], "Leadership");
    assert_eq!(score["scores"]["midterm"], serde_json::json!(31.5));
}

#[test]
fn legacy_flat_course_is_upgraded_on_save() {
    let dir = TempDir::new().unwrap();
    let courses = dir.path().join("courses");
    fs::create_dir_all(&courses).unwrap();
    fs::write(
        courses.join("Dance.json"),
        r#"{"midterm": {"label": "Midterm", "max": "40"}, "final": {"label": "Final", "max": 40},
            "lab": {"label": "Lab", "max": 20, "subComponents": {"x": {"label": "X", "max": 5}}}}"#,
    )
    .unwrap();

    let book = gradebook(&dir);
    let editor = book.open_course("Dance").unwrap();
    assert!(editor.was_repaired());
    assert_eq!(
        editor.tree().components().order(),
        &["final", "midterm", "psychomotor", "lab"]
    );
    assert!(editor
        .tree()
        .resolve(&ComponentPath::from(["lab"]))
        .unwrap()
        .is_leaf());

    // weights total 120 here; a warning, not an error, by default
    let report = book.save_course(&editor).unwrap();
    assert!(!report.warnings.is_empty());

    let stored = book.store().load_course("Dance").unwrap().unwrap();
    assert_eq!(stored.grading_config_order.len(), 4);
}

#[test]
fn strict_weight_total_blocks_save() {
    let dir = TempDir::new().unwrap();
    let settings = GradingSettings {
        require_full_weight: true,
        ..GradingSettings::default()
    };
    let book = Gradebook::new(JsonFileStore::new(dir.path()), settings);
    let mut editor = book.open_course("Dance").unwrap();
    editor
        .update_component(&ComponentPath::from(["final"]), NodeUpdate::weight(50.0))
        .unwrap();

    assert!(matches!(
        book.save_course(&editor),
        Err(ApiError::Validation(_))
    ));
    assert!(book.list_courses().unwrap().is_empty());
}

#[test]
fn class_summary_reads_every_stored_student() {
    let dir = TempDir::new().unwrap();
    let book = gradebook(&dir);
    for (student, midterm) in [("6503", 10.0), ("6501", 40.0), ("6502", 25.0)] {
        let scores: ScoreSheet = [("midterm", midterm), ("final", 30.0)].into_iter().collect();
        book.record_scores("Dance", student, &scores).unwrap();
    }

    let summary = book.class_summary("Dance", None).unwrap();
    let ids: Vec<&str> = summary
        .results
        .iter()
        .map(|r| r.student_id.as_str())
        .collect();
    assert_eq!(ids, vec!["6501", "6502", "6503"]);
    assert_eq!(summary.at_risk.len(), 1);
    assert_eq!(summary.at_risk[0].student_id, "6503");
}
