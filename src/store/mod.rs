//! Course Store
//!
//! Persistence port for course configurations and student scores. Each course
//! configuration is one document written as a whole snapshot; each
//! (student, course) pair has one score document. Saves are last-writer-wins.

pub mod memory;
pub mod persistence;

pub use memory::MemoryStore;
pub use persistence::JsonFileStore;

use crate::error::StorageError;
use crate::records::{CourseConfigRecord, ScoreRecord};

/// Course document store interface
pub trait CourseStore: Send + Sync {
    fn load_course(&self, course: &str) -> Result<Option<CourseConfigRecord>, StorageError>;
    fn save_course(&self, course: &str, record: &CourseConfigRecord) -> Result<(), StorageError>;
    fn list_courses(&self) -> Result<Vec<String>, StorageError>;

    /// Every score document of a course, ordered by student id.
    fn load_scores(&self, course: &str) -> Result<Vec<ScoreRecord>, StorageError>;
    fn load_score(&self, course: &str, student_id: &str)
        -> Result<Option<ScoreRecord>, StorageError>;
    fn save_score(&self, record: &ScoreRecord) -> Result<(), StorageError>;
}
