//! Core types shared by the rubric tree and the aggregator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between path segments in a full key.
pub const KEY_SEPARATOR: char = '.';

/// Key of a grading component within its parent's child set.
pub type ComponentKey = String;

/// Address of a component: the keys descended from the tree root.
///
/// The empty path denotes the whole tree rather than a single component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentPath(Vec<ComponentKey>);

impl ComponentPath {
    /// The root path (whole tree).
    pub fn root() -> Self {
        ComponentPath(Vec::new())
    }

    pub fn new(segments: Vec<ComponentKey>) -> Self {
        ComponentPath(segments)
    }

    /// Parse a dot-joined full key. The empty string is the root path.
    pub fn from_full_key(full_key: &str) -> Self {
        if full_key.is_empty() {
            return Self::root();
        }
        ComponentPath(full_key.split(KEY_SEPARATOR).map(str::to_string).collect())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[ComponentKey] {
        &self.0
    }

    /// Path of a child of this component.
    pub fn child(&self, key: impl Into<ComponentKey>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        ComponentPath(segments)
    }

    /// Split into the parent path and the final key; `None` for the root.
    pub fn split_last(&self) -> Option<(ComponentPath, &str)> {
        let (last, parent) = self.0.split_last()?;
        Some((ComponentPath(parent.to_vec()), last.as_str()))
    }

    /// Dot-joined key used to address stored scores.
    pub fn full_key(&self) -> String {
        self.0.join(&KEY_SEPARATOR.to_string())
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.full_key())
        }
    }
}

impl FromStr for ComponentPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_full_key(s))
    }
}

impl From<Vec<ComponentKey>> for ComponentPath {
    fn from(segments: Vec<ComponentKey>) -> Self {
        ComponentPath(segments)
    }
}

impl From<&[&str]> for ComponentPath {
    fn from(segments: &[&str]) -> Self {
        ComponentPath(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ComponentPath {
    fn from(segments: [&str; N]) -> Self {
        ComponentPath(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// Direction for swapping a sibling with its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("Invalid direction: {} (must be 'up' or 'down')", other)),
        }
    }
}
