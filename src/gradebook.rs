//! Gradebook service
//!
//! Ties a [`CourseStore`] to the grading engine: opening a course yields a
//! [`CourseEditor`] over a normalized tree, saving validates before the
//! snapshot is persisted, and score operations read and write one student's
//! document at a time.

use crate::aggregate::{summarize_class, ClassSummary, ScoreSheet, StudentReport};
use crate::config::GradingSettings;
use crate::error::ApiError;
use crate::policy;
use crate::records::{CourseConfigRecord, ScoreRecord};
use crate::store::CourseStore;
use crate::tree::{GradingComponent, GradingTree, NodeUpdate};
use crate::types::{ComponentKey, ComponentPath, Direction};
use crate::validation::{validate_scores, validate_tree, ScoreWarning, ValidationReport};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Working copy of one course's rubric.
///
/// Edits go through the tree's structural operations plus the course policy:
/// reserved top-level components can be reweighted but neither renamed nor
/// removed.
#[derive(Debug, Clone)]
pub struct CourseEditor {
    course: String,
    tree: GradingTree,
    activities: BTreeMap<String, serde_json::Value>,
    default_weight: f64,
    repaired: bool,
}

impl CourseEditor {
    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn tree(&self) -> &GradingTree {
        &self.tree
    }

    pub fn activities(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.activities
    }

    /// Whether loading had to seed components or repair an order.
    pub fn was_repaired(&self) -> bool {
        self.repaired
    }

    /// Add an unlabeled component of the configured default weight.
    pub fn add_component(&mut self, parent: &ComponentPath) -> Result<ComponentKey, ApiError> {
        Ok(self
            .tree
            .add_child_with(parent, "", self.default_weight)?)
    }

    pub fn add_labeled_component(
        &mut self,
        parent: &ComponentPath,
        label: impl Into<String>,
        weight: Option<f64>,
    ) -> Result<ComponentKey, ApiError> {
        let weight = weight.unwrap_or(self.default_weight);
        Ok(self.tree.add_child_with(parent, label, weight)?)
    }

    pub fn remove_component(
        &mut self,
        parent: &ComponentPath,
        key: &str,
    ) -> Result<GradingComponent, ApiError> {
        if policy::label_is_fixed(&parent.child(key)) {
            return Err(ApiError::ReservedComponent(key.to_string()));
        }
        Ok(self.tree.remove_child(parent, key)?)
    }

    pub fn update_component(
        &mut self,
        path: &ComponentPath,
        update: NodeUpdate,
    ) -> Result<(), ApiError> {
        if update.label.is_some() && policy::label_is_fixed(path) {
            return Err(ApiError::ReservedComponent(path.full_key()));
        }
        Ok(self.tree.update_node(path, update)?)
    }

    pub fn move_component(
        &mut self,
        parent: &ComponentPath,
        index: usize,
        direction: Direction,
    ) -> Result<bool, ApiError> {
        Ok(self.tree.move_sibling(parent, index, direction)?)
    }

    pub fn to_record(&self) -> CourseConfigRecord {
        CourseConfigRecord::from_tree(&self.tree, self.activities.clone())
    }
}

/// Course grading service over a document store.
pub struct Gradebook<S: CourseStore> {
    store: S,
    settings: GradingSettings,
}

impl<S: CourseStore> Gradebook<S> {
    pub fn new(store: S, settings: GradingSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &GradingSettings {
        &self.settings
    }

    pub fn list_courses(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.store.list_courses()?)
    }

    /// Load a course's rubric, or the default rubric if none is stored.
    ///
    /// Missing reserved components are seeded and placed first.
    pub fn open_course(&self, course: &str) -> Result<CourseEditor, ApiError> {
        let stored = self.store.load_course(course)?;
        let record_existed = stored.is_some();
        let (mut tree, activities, mut repaired) = match stored {
            Some(record) => {
                let loaded = record.to_tree()?;
                (loaded.tree, record.activities, loaded.repaired)
            }
            None => {
                debug!(course = %course, "No stored grading configuration; using defaults");
                (GradingTree::new(), BTreeMap::new(), false)
            }
        };

        let before = tree.components().order().to_vec();
        let added = policy::normalize_tree(&mut tree)?;
        if record_existed
            && (!added.is_empty() || tree.components().order() != before.as_slice())
        {
            repaired = true;
        }
        if repaired {
            warn!(course = %course, "Repaired grading configuration on load");
        }

        Ok(CourseEditor {
            course: course.to_string(),
            tree,
            activities,
            default_weight: self.settings.default_weight,
            repaired,
        })
    }

    /// Validate a rubric without saving it.
    pub fn validate_course(&self, editor: &CourseEditor) -> ValidationReport {
        validate_tree(editor.tree(), &self.settings.validation_options())
    }

    /// Validate, then persist the whole rubric snapshot.
    pub fn save_course(&self, editor: &CourseEditor) -> Result<ValidationReport, ApiError> {
        let report = self.validate_course(editor).into_result()?;
        for warning in &report.warnings {
            warn!(course = %editor.course(), "{}", warning);
        }
        self.store
            .save_course(editor.course(), &editor.to_record())?;
        info!(
            course = %editor.course(),
            components = editor.tree().walk().len(),
            "Saved grading configuration"
        );
        Ok(report)
    }

    fn load_or_new(&self, course: &str, student_id: &str) -> Result<ScoreRecord, ApiError> {
        Ok(self
            .store
            .load_score(course, student_id)?
            .unwrap_or_else(|| ScoreRecord::new(student_id, course)))
    }

    /// Set one score. Returns advisory warnings about the written value.
    pub fn record_score(
        &self,
        course: &str,
        student_id: &str,
        full_key: &str,
        value: f64,
    ) -> Result<Vec<ScoreWarning>, ApiError> {
        let mut single = ScoreSheet::new();
        single.set(full_key, value);
        self.record_scores(course, student_id, &single)
    }

    /// Merge several scores into a student's document in one write.
    pub fn record_scores(
        &self,
        course: &str,
        student_id: &str,
        scores: &ScoreSheet,
    ) -> Result<Vec<ScoreWarning>, ApiError> {
        let editor = self.open_course(course)?;
        let warnings = validate_scores(editor.tree(), scores);
        for warning in &warnings {
            warn!(course = %course, student = %student_id, "{}", warning);
        }

        let mut record = self.load_or_new(course, student_id)?;
        record.scores.merge(scores);
        self.store.save_score(&record)?;
        debug!(course = %course, student = %student_id, count = scores.len(), "Recorded scores");
        Ok(warnings)
    }

    /// Remove a score; returns the previous value if there was one.
    pub fn clear_score(
        &self,
        course: &str,
        student_id: &str,
        full_key: &str,
    ) -> Result<Option<f64>, ApiError> {
        let Some(mut record) = self.store.load_score(course, student_id)? else {
            return Ok(None);
        };
        let previous = record.scores.remove(full_key);
        if previous.is_some() {
            self.store.save_score(&record)?;
        }
        Ok(previous)
    }

    pub fn student_scores(&self, course: &str, student_id: &str) -> Result<ScoreSheet, ApiError> {
        Ok(self.load_or_new(course, student_id)?.scores)
    }

    pub fn student_report(&self, course: &str, student_id: &str) -> Result<StudentReport, ApiError> {
        let editor = self.open_course(course)?;
        let scores = self.student_scores(course, student_id)?;
        Ok(StudentReport::build(
            student_id,
            course,
            editor.tree(),
            &scores,
            &self.settings.scale(),
        ))
    }

    /// Summarize a class.
    ///
    /// With a roster, every listed student is included (unscored students total
    /// 0); without one, every student with a stored score document is.
    pub fn class_summary(
        &self,
        course: &str,
        roster: Option<&[String]>,
    ) -> Result<ClassSummary, ApiError> {
        let editor = self.open_course(course)?;
        let mut stored: BTreeMap<String, ScoreSheet> = self
            .store
            .load_scores(course)?
            .into_iter()
            .map(|record| (record.student_id, record.scores))
            .collect();

        let students: Vec<(String, ScoreSheet)> = match roster {
            Some(ids) => ids
                .iter()
                .map(|id| (id.clone(), stored.remove(id).unwrap_or_default()))
                .collect(),
            None => stored.into_iter().collect(),
        };

        Ok(summarize_class(
            editor.tree(),
            &students,
            &self.settings.scale(),
            self.settings.pass_mark,
        ))
    }
}
