//! JSON output contracts of the CLI commands.

use gradetree::tooling::cli::{
    CliContext, Commands, OutputFormat, ScoreCommands, TreeCommands,
};
use gradetree::config::GradetreeConfig;
use tempfile::TempDir;

fn json_context(dir: &TempDir) -> CliContext {
    CliContext::with_config(Some(dir.path().to_path_buf()), GradetreeConfig::default())
        .unwrap()
        .with_format(OutputFormat::Json)
}

fn parse(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap()
}

#[test]
fn tree_show_json_is_a_course_record() {
    let dir = TempDir::new().unwrap();
    let cli = json_context(&dir);

    let output = cli
        .execute(&Commands::Tree {
            command: TreeCommands::Show {
                course: "Dance".to_string(),
            },
        })
        .unwrap();
    let parsed = parse(&output);
    assert!(parsed.get("gradingConfig").and_then(|v| v.as_object()).is_some());
    assert_eq!(
        parsed["gradingConfigOrder"].as_array().map(|a| a.len()),
        Some(3)
    );
}

#[test]
fn validate_json_contract_has_required_fields() {
    let dir = TempDir::new().unwrap();
    let cli = json_context(&dir);

    let output = cli
        .execute(&Commands::Validate {
            course: "Dance".to_string(),
        })
        .unwrap();
    let parsed = parse(&output);
    assert_eq!(parsed["valid"].as_bool(), Some(true));
    assert!(parsed.get("issues").and_then(|v| v.as_array()).is_some());
    assert!(parsed.get("warnings").and_then(|v| v.as_array()).is_some());
}

#[test]
fn score_set_json_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let cli = json_context(&dir);

    let output = cli
        .execute(&Commands::Score {
            command: ScoreCommands::Set {
                course: "Dance".to_string(),
                student: "6501".to_string(),
                scores: vec![("midterm".to_string(), 45.0), ("lab".to_string(), 3.0)],
            },
        })
        .unwrap();
    let parsed = parse(&output);
    assert_eq!(parsed["recorded"].as_u64(), Some(2));
    let kinds: Vec<&str> = parsed["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|w| w["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"above_max"));
    assert!(kinds.contains(&"unknown_key"));
}

#[test]
fn report_json_contract_has_required_fields() {
    let dir = TempDir::new().unwrap();
    let cli = json_context(&dir);
    cli.execute(&Commands::Score {
        command: ScoreCommands::Set {
            course: "Dance".to_string(),
            student: "6501".to_string(),
            scores: vec![
                ("psychomotor".to_string(), 18.0),
                ("midterm".to_string(), 30.0),
                ("final".to_string(), 35.0),
            ],
        },
    })
    .unwrap();

    let output = cli
        .execute(&Commands::Report {
            course: "Dance".to_string(),
            student: "6501".to_string(),
        })
        .unwrap();
    let parsed = parse(&output);
    assert_eq!(parsed["total"].as_f64(), Some(83.0));
    assert_eq!(parsed["grade"].as_f64(), Some(4.0));
    assert_eq!(parsed["lines"].as_array().map(|a| a.len()), Some(3));
    assert_eq!(parsed["student_id"], "6501");
}

#[test]
fn move_json_reflects_new_order() {
    let dir = TempDir::new().unwrap();
    let cli = json_context(&dir);

    let output = cli
        .execute(&Commands::Tree {
            command: TreeCommands::Move {
                course: "Dance".to_string(),
                parent: None,
                index: 2,
                direction: gradetree::types::Direction::Up,
            },
        })
        .unwrap();
    let parsed = parse(&output);
    assert_eq!(
        parsed["gradingConfigOrder"],
        serde_json::json!(["psychomotor", "final", "midterm"])
    );
}
