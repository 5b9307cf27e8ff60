//! Rubric and score validation
//!
//! Checks run before a grading configuration is persisted, and advisory checks
//! for score sheets against the rubric they are scored by.

use crate::aggregate::ScoreSheet;
use crate::error::{ValidationError, ValidationIssue};
use crate::tree::GradingTree;
use crate::types::ComponentPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected sum of top-level weights.
pub const FULL_WEIGHT: f64 = 100.0;

const WEIGHT_EPSILON: f64 = 1e-9;

/// Knobs for pre-save validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Treat a top-level weight total other than 100 as an error instead of a warning.
    pub require_full_weight: bool,
}

/// Outcome of validating a rubric.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub checks: Vec<(String, bool)>,
    pub issues: Vec<ValidationIssue>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn add_check(&mut self, description: &str, passed: bool) {
        self.checks.push((description.to_string(), passed));
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|(_, passed)| *passed).count()
    }

    /// Errors become a `ValidationError`; warnings are kept on success.
    pub fn into_result(self) -> Result<ValidationReport, ValidationError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}

/// Validate a rubric before it is saved.
///
/// Empty or whitespace-only labels at any depth always block the save.
pub fn validate_tree(tree: &GradingTree, options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::default();
    let entries = tree.walk();

    let mut empty_labels = 0;
    for entry in &entries {
        if entry.component.label.trim().is_empty() {
            empty_labels += 1;
            report.issues.push(ValidationIssue::EmptyLabel {
                full_key: entry.path.full_key(),
            });
        }
        if entry.component.weight < 0.0 {
            report.warnings.push(format!(
                "Component '{}' has negative weight {}",
                entry.path.full_key(),
                entry.component.weight
            ));
        }
        if !entry.component.is_leaf() && entry.component.raw_max_points() == 0.0 {
            report.warnings.push(format!(
                "Component '{}' has no leaf weight beneath it and always scores 0",
                entry.path.full_key()
            ));
        }
    }
    report.add_check("All components have labels", empty_labels == 0);

    if tree.is_empty() {
        report.warnings.push("Grading configuration has no components".to_string());
    }

    let total = tree.total_weight();
    let full = (total - FULL_WEIGHT).abs() < WEIGHT_EPSILON;
    report.add_check("Top-level weights sum to 100", full);
    if !full {
        if options.require_full_weight {
            report.issues.push(ValidationIssue::WeightTotal {
                total,
                expected: FULL_WEIGHT,
            });
        } else {
            report.warnings.push(format!(
                "Top-level weights sum to {}, grades assume {}",
                total, FULL_WEIGHT
            ));
        }
    }

    report
}

/// Advisory problem with a stored score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreWarning {
    /// Score stored on a component that has sub-components; it is never read.
    InternalNode { full_key: String },
    /// Score for a key that names no component.
    UnknownKey { full_key: String },
    AboveMax { full_key: String, score: f64, max: f64 },
    Negative { full_key: String, score: f64 },
}

impl fmt::Display for ScoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreWarning::InternalNode { full_key } => {
                write!(f, "Score for '{}' is ignored: it has sub-components", full_key)
            }
            ScoreWarning::UnknownKey { full_key } => {
                write!(f, "Score for '{}' matches no grading component", full_key)
            }
            ScoreWarning::AboveMax {
                full_key,
                score,
                max,
            } => write!(f, "Score {} for '{}' exceeds its maximum {}", score, full_key, max),
            ScoreWarning::Negative { full_key, score } => {
                write!(f, "Score {} for '{}' is negative", score, full_key)
            }
        }
    }
}

/// Check a score sheet against the rubric.
pub fn validate_scores(tree: &GradingTree, scores: &ScoreSheet) -> Vec<ScoreWarning> {
    let mut warnings = Vec::new();
    for (full_key, score) in scores.iter() {
        let path = ComponentPath::from_full_key(full_key);
        let component = match tree.resolve(&path) {
            Ok(component) => component,
            Err(_) => {
                warnings.push(ScoreWarning::UnknownKey {
                    full_key: full_key.clone(),
                });
                continue;
            }
        };
        if !component.is_leaf() {
            warnings.push(ScoreWarning::InternalNode {
                full_key: full_key.clone(),
            });
            continue;
        }
        if *score < 0.0 {
            warnings.push(ScoreWarning::Negative {
                full_key: full_key.clone(),
                score: *score,
            });
        } else if *score > component.weight {
            warnings.push(ScoreWarning::AboveMax {
                full_key: full_key.clone(),
                score: *score,
                max: component.weight,
            });
        }
    }
    warnings
}
