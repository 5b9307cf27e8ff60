//! Raw score sheets and numeric coercion.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Source of raw leaf scores addressed by full key.
pub trait ScoreSource {
    fn raw_score(&self, full_key: &str) -> Option<f64>;
}

/// Score of the leaf at `full_key`: missing and non-finite values count as 0.
pub fn leaf_score<S: ScoreSource + ?Sized>(scores: &S, full_key: &str) -> f64 {
    match scores.raw_score(full_key) {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Coerce an arbitrary JSON value to a score.
///
/// Numbers pass through; strings holding a number (surrounding whitespace
/// allowed) are parsed; everything else, including non-finite results, is 0.
pub fn coerce_score(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Raw scores of one student in one course, keyed by full key.
///
/// Deserialization is lenient: any JSON value is accepted and coerced with
/// [`coerce_score`], so a sheet never holds NaN or infinities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreSheet(BTreeMap<String, f64>);

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a score; non-finite values are stored as 0.
    pub fn set(&mut self, full_key: impl Into<String>, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.0.insert(full_key.into(), value);
    }

    pub fn remove(&mut self, full_key: &str) -> Option<f64> {
        self.0.remove(full_key)
    }

    pub fn get(&self, full_key: &str) -> Option<f64> {
        self.0.get(full_key).copied()
    }

    pub fn contains_key(&self, full_key: &str) -> bool {
        self.0.contains_key(full_key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }

    /// Overwrite entries with those of `other`.
    pub fn merge(&mut self, other: &ScoreSheet) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), *value);
        }
    }
}

impl ScoreSource for ScoreSheet {
    fn raw_score(&self, full_key: &str) -> Option<f64> {
        self.get(full_key)
    }
}

impl ScoreSource for HashMap<String, f64> {
    fn raw_score(&self, full_key: &str) -> Option<f64> {
        self.get(full_key).copied()
    }
}

impl ScoreSource for BTreeMap<String, f64> {
    fn raw_score(&self, full_key: &str) -> Option<f64> {
        self.get(full_key).copied()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ScoreSheet {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        let mut sheet = ScoreSheet::new();
        for (key, value) in iter {
            sheet.set(key, value);
        }
        sheet
    }
}

impl<'de> Deserialize<'de> for ScoreSheet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SheetVisitor;

        impl<'de> Visitor<'de> for SheetVisitor {
            type Value = ScoreSheet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of full keys to scores")
            }

            fn visit_map<A>(self, mut map: A) -> Result<ScoreSheet, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sheet = ScoreSheet::new();
                while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                    let score = coerce_score(&value);
                    if !value.is_number() && score == 0.0 {
                        tracing::warn!(key = %key, raw = %value, "Coerced non-numeric score to 0");
                    }
                    sheet.0.insert(key, score);
                }
                Ok(sheet)
            }
        }

        deserializer.deserialize_map(SheetVisitor)
    }
}
