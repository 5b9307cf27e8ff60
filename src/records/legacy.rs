//! Ingestion of course documents written in the legacy flat format.
//!
//! Older documents stored components directly at the top level (or under
//! `gradingConfig` without `gradingConfigOrder`) and never nested. Each entry
//! becomes a leaf; any nested fields left over from partial migrations are
//! dropped.

use super::{ComponentRecord, CourseConfigRecord};
use serde::de::Error as _;
use std::collections::BTreeMap;

/// Layout a course document was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Nested,
    LegacyFlat,
}

/// Parse a raw course document in either layout.
pub fn parse_course_document(
    document: serde_json::Value,
) -> Result<(CourseConfigRecord, DocumentFormat), serde_json::Error> {
    let object = document
        .as_object()
        .ok_or_else(|| serde_json::Error::custom("course document must be a JSON object"))?;

    if object.contains_key("gradingConfig") && object.contains_key("gradingConfigOrder") {
        let record: CourseConfigRecord = serde_json::from_value(document)?;
        return Ok((record, DocumentFormat::Nested));
    }

    let flat = match object.get("gradingConfig") {
        Some(config) => config.clone(),
        None => document.clone(),
    };
    let entries = flat
        .as_object()
        .ok_or_else(|| serde_json::Error::custom("legacy grading config must be a JSON object"))?;

    let mut grading_config = BTreeMap::new();
    for (key, value) in entries {
        if !value.is_object() {
            tracing::warn!(key = %key, "Skipping non-component entry in legacy course document");
            continue;
        }
        let mut component: ComponentRecord = serde_json::from_value(value.clone())?;
        component.sub_components = None;
        component.sub_components_order = None;
        grading_config.insert(key.clone(), component);
    }
    let grading_config_order = grading_config.keys().cloned().collect();

    Ok((
        CourseConfigRecord {
            grading_config,
            grading_config_order,
            activities: BTreeMap::new(),
        },
        DocumentFormat::LegacyFlat,
    ))
}
