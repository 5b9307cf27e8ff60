//! In-memory course store

use super::CourseStore;
use crate::error::StorageError;
use crate::records::{CourseConfigRecord, ScoreRecord};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Course store held in process memory; safe to share across threads.
#[derive(Default)]
pub struct MemoryStore {
    courses: RwLock<BTreeMap<String, CourseConfigRecord>>,
    /// (course, student_id) -> scores
    scores: RwLock<BTreeMap<(String, String), ScoreRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CourseStore for MemoryStore {
    fn load_course(&self, course: &str) -> Result<Option<CourseConfigRecord>, StorageError> {
        Ok(self.courses.read().get(course).cloned())
    }

    fn save_course(&self, course: &str, record: &CourseConfigRecord) -> Result<(), StorageError> {
        self.courses
            .write()
            .insert(course.to_string(), record.clone());
        Ok(())
    }

    fn list_courses(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.courses.read().keys().cloned().collect())
    }

    fn load_scores(&self, course: &str) -> Result<Vec<ScoreRecord>, StorageError> {
        Ok(self
            .scores
            .read()
            .iter()
            .filter(|((c, _), _)| c == course)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn load_score(
        &self,
        course: &str,
        student_id: &str,
    ) -> Result<Option<ScoreRecord>, StorageError> {
        Ok(self
            .scores
            .read()
            .get(&(course.to_string(), student_id.to_string()))
            .cloned())
    }

    fn save_score(&self, record: &ScoreRecord) -> Result<(), StorageError> {
        self.scores.write().insert(
            (record.course.clone(), record.student_id.clone()),
            record.clone(),
        );
        Ok(())
    }
}
