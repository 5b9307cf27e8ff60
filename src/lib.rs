//! Gradetree: Weighted Grading Rubrics
//!
//! A course's grading configuration is a recursive tree of weighted, labeled
//! components. Raw scores are recorded against leaves; each scored component
//! rescales the raw sum of its leaves onto its own weight, and the sum over
//! top-level components maps to a grade point through a step scale.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod gradebook;
pub mod logging;
pub mod policy;
pub mod records;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod validation;

pub use aggregate::{letter_grade, total_score, weighted_score, GradeScale, ScoreSheet};
pub use error::{ApiError, TreeError};
pub use gradebook::{CourseEditor, Gradebook};
pub use tree::{GradingComponent, GradingTree, NodeUpdate};
pub use types::{ComponentPath, Direction};
