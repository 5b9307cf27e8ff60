//! Persisted record shapes
//!
//! The course-config document (`gradingConfig`, `gradingConfigOrder`,
//! `activities`) and the per-student score document, with conversions between
//! the nested component records and a [`GradingTree`].

pub mod legacy;

pub use legacy::{parse_course_document, DocumentFormat};

use crate::aggregate::{coerce_score, ScoreSheet};
use crate::error::TreeError;
use crate::tree::{keys, ComponentSet, GradingComponent, GradingTree};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_score(&value))
}

/// Stored form of one grading component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    #[serde(default)]
    pub label: String,
    /// The component's weight.
    #[serde(default, deserialize_with = "lenient_number")]
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_components: Option<BTreeMap<String, ComponentRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_components_order: Option<Vec<String>>,
}

/// Stored course configuration, one document per course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseConfigRecord {
    pub grading_config: BTreeMap<String, ComponentRecord>,
    pub grading_config_order: Vec<String>,
    /// Activity records keyed by id; carried through untouched.
    #[serde(default)]
    pub activities: BTreeMap<String, serde_json::Value>,
}

/// Stored scores of one student in one course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub student_id: String,
    pub course: String,
    #[serde(default)]
    pub scores: ScoreSheet,
}

impl ScoreRecord {
    pub fn new(student_id: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            course: course.into(),
            scores: ScoreSheet::new(),
        }
    }
}

/// A tree rebuilt from a record, with whether any order had to be repaired.
#[derive(Debug, Clone)]
pub struct LoadedTree {
    pub tree: GradingTree,
    pub repaired: bool,
}

fn component_from_record(record: &ComponentRecord) -> Result<(GradingComponent, bool), TreeError> {
    let component = GradingComponent::new(record.label.clone(), record.max);
    let Some(sub_components) = record.sub_components.as_ref().filter(|s| !s.is_empty()) else {
        let dangling_order = record
            .sub_components_order
            .as_ref()
            .map_or(false, |order| !order.is_empty());
        return Ok((component, dangling_order));
    };

    let (children, repaired) = set_from_records(
        sub_components,
        record.sub_components_order.as_deref().unwrap_or(&[]),
    )?;
    Ok((component.with_children(children), repaired))
}

fn set_from_records(
    records: &BTreeMap<String, ComponentRecord>,
    order: &[String],
) -> Result<(ComponentSet, bool), TreeError> {
    let mut entries = Vec::with_capacity(records.len());
    let mut repaired = false;
    for (key, record) in records {
        keys::validate_key(key)?;
        let (component, child_repaired) = component_from_record(record)?;
        repaired |= child_repaired;
        entries.push((key.clone(), component));
    }
    let (set, order_repaired) = ComponentSet::from_parts(entries, order);
    Ok((set, repaired || order_repaired))
}

fn component_to_record(component: &GradingComponent) -> ComponentRecord {
    if component.is_leaf() {
        return ComponentRecord {
            label: component.label.clone(),
            max: component.weight,
            sub_components: None,
            sub_components_order: None,
        };
    }
    let children = component.children();
    ComponentRecord {
        label: component.label.clone(),
        max: component.weight,
        sub_components: Some(
            children
                .iter()
                .map(|(key, child)| (key.clone(), component_to_record(child)))
                .collect(),
        ),
        sub_components_order: Some(children.order().to_vec()),
    }
}

impl CourseConfigRecord {
    /// Snapshot a tree into its stored form.
    pub fn from_tree(tree: &GradingTree, activities: BTreeMap<String, serde_json::Value>) -> Self {
        let components = tree.components();
        Self {
            grading_config: components
                .iter()
                .map(|(key, component)| (key.clone(), component_to_record(component)))
                .collect(),
            grading_config_order: components.order().to_vec(),
            activities,
        }
    }

    /// Rebuild the tree, repairing orders that disagree with their key sets.
    ///
    /// Fails only on keys that cannot be addressed by a full key.
    pub fn to_tree(&self) -> Result<LoadedTree, TreeError> {
        let (components, repaired) =
            set_from_records(&self.grading_config, &self.grading_config_order)?;
        Ok(LoadedTree {
            tree: GradingTree::from_components(components),
            repaired,
        })
    }
}
