//! JSON document store on the local filesystem.
//!
//! Layout under the data directory:
//!
//! ```text
//! courses/<course>.json
//! scores/<course>/<student_id>.json
//! ```
//!
//! Every save writes a sibling temp file and renames it over the target, so a
//! reader never observes a partially written document.

use super::CourseStore;
use crate::error::StorageError;
use crate::records::{parse_course_document, CourseConfigRecord, DocumentFormat, ScoreRecord};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

const JSON_EXTENSION: &str = "json";

pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn courses_dir(&self) -> PathBuf {
        self.root.join("courses")
    }

    fn scores_dir(&self, course: &str) -> Result<PathBuf, StorageError> {
        validate_identifier(course)?;
        Ok(self.root.join("scores").join(course))
    }

    pub fn course_path(&self, course: &str) -> Result<PathBuf, StorageError> {
        validate_identifier(course)?;
        Ok(self.courses_dir().join(format!("{}.{}", course, JSON_EXTENSION)))
    }

    pub fn score_path(&self, course: &str, student_id: &str) -> Result<PathBuf, StorageError> {
        validate_identifier(student_id)?;
        Ok(self
            .scores_dir(course)?
            .join(format!("{}.{}", student_id, JSON_EXTENSION)))
    }
}

/// Course names and student ids become file names; reject anything that could
/// escape its directory.
fn validate_identifier(id: &str) -> Result<(), StorageError> {
    if id.trim().is_empty()
        || id.starts_with('.')
        || id.contains('/')
        || id.contains('\\')
        || id.contains('\0')
    {
        return Err(StorageError::InvalidIdentifier(id.to_string()));
    }
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    let content = serde_json::to_string_pretty(value).map_err(|e| StorageError::Malformed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content).map_err(|e| io_error(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| io_error(path, e))?;
    Ok(())
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Failed to read directory entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.extension() == Some(OsStr::new(JSON_EXTENSION)) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

impl CourseStore for JsonFileStore {
    fn load_course(&self, course: &str) -> Result<Option<CourseConfigRecord>, StorageError> {
        let path = self.course_path(course)?;
        let Some(content) = read_optional(&path)? else {
            return Ok(None);
        };

        let malformed = |message: String| StorageError::Malformed {
            path: path.display().to_string(),
            message,
        };
        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;
        let (record, format) =
            parse_course_document(document).map_err(|e| malformed(e.to_string()))?;

        if format == DocumentFormat::LegacyFlat {
            tracing::warn!(
                course = %course,
                path = %path.display(),
                "Loaded legacy flat course document; it will be rewritten as nested on save"
            );
        }
        Ok(Some(record))
    }

    fn save_course(&self, course: &str, record: &CourseConfigRecord) -> Result<(), StorageError> {
        let path = self.course_path(course)?;
        write_atomic(&path, record)?;
        tracing::debug!(course = %course, path = %path.display(), "Saved course document");
        Ok(())
    }

    fn list_courses(&self) -> Result<Vec<String>, StorageError> {
        Ok(json_files(&self.courses_dir())?
            .iter()
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()))
            .map(str::to_string)
            .collect())
    }

    fn load_scores(&self, course: &str) -> Result<Vec<ScoreRecord>, StorageError> {
        let dir = self.scores_dir(course)?;
        let mut loaded = Vec::new();
        for path in json_files(&dir)? {
            let content = match fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Failed to read score document {}: {}", path.display(), e);
                    continue;
                }
            };
            let record: ScoreRecord = match serde_json::from_str(&content) {
                Ok(record) => record,
                Err(e) => {
                    tracing::error!("Failed to parse score document {}: {}", path.display(), e);
                    continue;
                }
            };
            if record.course != course {
                tracing::warn!(
                    "Course mismatch in {}: directory={}, document={}",
                    path.display(),
                    course,
                    record.course
                );
            }
            loaded.push(record);
        }
        loaded.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        Ok(loaded)
    }

    fn load_score(
        &self,
        course: &str,
        student_id: &str,
    ) -> Result<Option<ScoreRecord>, StorageError> {
        let path = self.score_path(course, student_id)?;
        let Some(content) = read_optional(&path)? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&content).map_err(|e| StorageError::Malformed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(record))
    }

    fn save_score(&self, record: &ScoreRecord) -> Result<(), StorageError> {
        let path = self.score_path(&record.course, &record.student_id)?;
        write_atomic(&path, record)
    }
}
