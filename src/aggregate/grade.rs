//! Grade-point mapping of weighted totals.

use serde::{Deserialize, Serialize};

/// Default thresholds as `(minimum total, grade point)`, highest first.
pub const DEFAULT_GRADE_STEPS: [(f64, f64); 7] = [
    (80.0, 4.0),
    (75.0, 3.5),
    (70.0, 3.0),
    (65.0, 2.5),
    (60.0, 2.0),
    (55.0, 1.5),
    (50.0, 1.0),
];

/// Grade point for totals below every threshold.
pub const FLOOR_GRADE: f64 = 0.0;

/// Grade point for a 0-100 weighted total using the default table.
pub fn letter_grade(total: f64) -> f64 {
    for (min_total, grade) in DEFAULT_GRADE_STEPS {
        if total >= min_total {
            return grade;
        }
    }
    FLOOR_GRADE
}

/// Display form used for grade points, e.g. `"3.5"`.
pub fn format_grade(grade: f64) -> String {
    format!("{:.1}", grade)
}

/// One threshold of a grade scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeStep {
    pub min_total: f64,
    pub grade: f64,
}

/// A step function from weighted total to grade point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    pub steps: Vec<GradeStep>,
    #[serde(default)]
    pub floor: f64,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            steps: DEFAULT_GRADE_STEPS
                .iter()
                .map(|&(min_total, grade)| GradeStep { min_total, grade })
                .collect(),
            floor: FLOOR_GRADE,
        }
    }
}

impl GradeScale {
    /// Grade of the highest threshold `total` reaches.
    ///
    /// Independent of step order; NaN reaches no threshold.
    pub fn grade_for(&self, total: f64) -> f64 {
        self.steps
            .iter()
            .filter(|step| total >= step.min_total)
            .max_by(|a, b| a.min_total.total_cmp(&b.min_total))
            .map(|step| step.grade)
            .unwrap_or(self.floor)
    }

    /// Every grade point the scale can produce, highest first.
    pub fn grade_points(&self) -> Vec<f64> {
        let mut points: Vec<f64> = self.steps.iter().map(|step| step.grade).collect();
        points.push(self.floor);
        points.sort_by(|a, b| b.total_cmp(a));
        points.dedup();
        points
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.steps.is_empty() {
            return Err("Grade scale must have at least one step".to_string());
        }
        for step in &self.steps {
            if !step.min_total.is_finite() || !step.grade.is_finite() {
                return Err(format!(
                    "Grade scale step must be finite, got min_total={} grade={}",
                    step.min_total, step.grade
                ));
            }
        }
        Ok(())
    }
}
