//! Attribute-set reconciliation
//!
//! Turns a product's stored attribute assignments into a newly submitted set
//! by computing three disjoint action lists keyed by attribute id:
//!
//! - `to_add`: submitted ids not currently assigned
//! - `to_update`: submitted ids already assigned (value always rewritten)
//! - `to_remove`: assigned ids missing from the submission
//!
//! Applying the lists in any order yields the same end state; callers run
//! them inside one transaction together with the product field update.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One attribute assignment: "this attribute has this value"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub attribute_id: i64,
    pub value: String,
}

impl AttributeValue {
    pub fn new(attribute_id: i64, value: impl Into<String>) -> Self {
        Self {
            attribute_id,
            value: value.into(),
        }
    }
}

/// Actions that turn the current assignment set into the submitted one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDiff {
    pub to_add: Vec<AttributeValue>,
    pub to_update: Vec<AttributeValue>,
    pub to_remove: Vec<i64>,
}

impl AttributeDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }

    /// Assignment set produced by applying this diff to `current`
    ///
    /// Kept entries stay in their current order; additions are appended.
    pub fn apply_to(&self, current: &[AttributeValue]) -> Vec<AttributeValue> {
        let removed: HashSet<i64> = self.to_remove.iter().copied().collect();
        let updates: HashMap<i64, &str> = self
            .to_update
            .iter()
            .map(|u| (u.attribute_id, u.value.as_str()))
            .collect();

        current
            .iter()
            .filter(|entry| !removed.contains(&entry.attribute_id))
            .map(|entry| match updates.get(&entry.attribute_id) {
                Some(value) => AttributeValue::new(entry.attribute_id, *value),
                None => entry.clone(),
            })
            .chain(self.to_add.iter().cloned())
            .collect()
    }
}

/// Collapse duplicate attribute ids, last value wins
///
/// Each id keeps the position of its first occurrence.
pub fn dedup_last_wins(entries: &[AttributeValue]) -> Vec<AttributeValue> {
    let mut out: Vec<AttributeValue> = Vec::with_capacity(entries.len());
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(entries.len());

    for entry in entries {
        match index.get(&entry.attribute_id) {
            Some(&pos) => out[pos].value = entry.value.clone(),
            None => {
                index.insert(entry.attribute_id, out.len());
                out.push(entry.clone());
            }
        }
    }

    out
}

/// Compute the three-way diff between stored and submitted assignments
pub fn reconcile(current: &[AttributeValue], submitted: &[AttributeValue]) -> AttributeDiff {
    let submitted = dedup_last_wins(submitted);
    let current_ids: HashSet<i64> = current.iter().map(|c| c.attribute_id).collect();
    let submitted_ids: HashSet<i64> = submitted.iter().map(|s| s.attribute_id).collect();

    let (to_update, to_add): (Vec<_>, Vec<_>) = submitted
        .into_iter()
        .partition(|entry| current_ids.contains(&entry.attribute_id));

    let mut seen = HashSet::new();
    let to_remove = current
        .iter()
        .map(|c| c.attribute_id)
        .filter(|id| !submitted_ids.contains(id) && seen.insert(*id))
        .collect();

    AttributeDiff {
        to_add,
        to_update,
        to_remove,
    }
}
