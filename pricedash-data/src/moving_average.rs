//! Moving-average label canonicalisation.
//!
//! Backends label the same window `MA7`, `ma_7`, `7`, `sma7d`... Labels carrying
//! a digit run are rewritten to `MA<digits>`; anything else passes through.

use crate::normalise::coerce_number;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Canonical label → moving-average values, index-aligned with the series.
///
/// Values are kept exactly as delivered; numeric coercion happens when a
/// consumer reads an element.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MovingAverageSet(IndexMap<String, Vec<Value>>);

impl MovingAverageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&[Value]> {
        self.0.get(label).map(Vec::as_slice)
    }

    /// Insert or replace the values for `label`
    pub fn insert(&mut self, label: impl Into<String>, values: Vec<Value>) {
        self.0.insert(label.into(), values);
    }

    /// Labels in first-insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric value at `index`, if present and coercible
    pub fn value_at(&self, label: &str, index: usize) -> Option<f64> {
        self.get(label)?.get(index).and_then(coerce_number)
    }

    /// Numeric value of the last element, if present and coercible
    pub fn last_value(&self, label: &str) -> Option<f64> {
        self.get(label)?.last().and_then(coerce_number)
    }
}

/// `MA<digits>` for the first ASCII digit run in `label`.
pub fn canonical_label(label: &str) -> Option<String> {
    let start = label.find(|c: char| c.is_ascii_digit())?;
    let tail = &label[start..];
    let end = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
    Some(format!("MA{}", &tail[..end]))
}

/// Canonicalise the upstream `moving_averages` object.
///
/// Entries are processed in payload order and a later entry whose label maps to
/// an existing canonical label replaces it. Non-array values are skipped.
pub fn normalise_moving_averages(raw: &Value) -> MovingAverageSet {
    let Some(entries) = raw.as_object() else {
        if !raw.is_null() {
            debug!("moving averages payload is not an object, treating as empty");
        }
        return MovingAverageSet::new();
    };

    let mut out = MovingAverageSet::new();
    for (label, values) in entries {
        let Some(values) = values.as_array() else {
            debug!(%label, "skipping moving average that is not an array");
            continue;
        };

        let canonical = canonical_label(label).unwrap_or_else(|| label.clone());
        out.insert(canonical, values.clone());
    }

    out
}
