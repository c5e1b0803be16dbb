use std::collections::{BTreeMap, BTreeSet};

use crate::group::GroupedFailures;

/// How the values of a key present in both builds differ. Each set is `None` rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDiff {
    pub values_only_in_a: Option<BTreeSet<String>>,
    pub values_only_in_b: Option<BTreeSet<String>>,
    pub values_common: Option<BTreeSet<String>>,
}

impl KeyDiff {
    pub fn is_empty(&self) -> bool {
        self.values_only_in_a.is_none()
            && self.values_only_in_b.is_none()
            && self.values_common.is_none()
    }
}

/// Result of comparing two groupings. Sections with nothing in them are `None`, never an empty
/// container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub only_in_a: Option<GroupedFailures>,
    pub only_in_b: Option<GroupedFailures>,
    pub per_key_diff: Option<BTreeMap<String, KeyDiff>>,
}

impl DiffResult {
    /// True when the two sides had anything that was not in common.
    pub fn has_differences(&self) -> bool {
        self.only_in_a.is_some()
            || self.only_in_b.is_some()
            || self.per_key_diff.iter().flat_map(|m| m.values()).any(|d| {
                d.values_only_in_a.is_some() || d.values_only_in_b.is_some()
            })
    }
}

pub fn diff(a: &GroupedFailures, b: &GroupedFailures) -> DiffResult {
    let per_key_diff: BTreeMap<String, KeyDiff> = a
        .iter()
        .filter_map(|(key, a_values)| {
            let b_values = b.get(key)?;
            let key_diff = diff_values(a_values, b_values);
            (!key_diff.is_empty()).then(|| (key.to_string(), key_diff))
        })
        .collect();

    DiffResult {
        only_in_a: only_in(a, b),
        only_in_b: only_in(b, a),
        per_key_diff: (!per_key_diff.is_empty()).then_some(per_key_diff),
    }
}

fn only_in(this: &GroupedFailures, other: &GroupedFailures) -> Option<GroupedFailures> {
    let only: GroupedFailures = this
        .iter()
        .filter(|(key, _)| !other.contains_key(key))
        .map(|(key, values)| (key, values.to_vec()))
        .collect();
    (!only.is_empty()).then_some(only)
}

fn diff_values(a: &[String], b: &[String]) -> KeyDiff {
    let a: BTreeSet<String> = a.iter().cloned().collect();
    let b: BTreeSet<String> = b.iter().cloned().collect();

    KeyDiff {
        values_only_in_a: non_empty(a.difference(&b).cloned().collect()),
        values_only_in_b: non_empty(b.difference(&a).cloned().collect()),
        values_common: non_empty(a.intersection(&b).cloned().collect()),
    }
}

fn non_empty(set: BTreeSet<String>) -> Option<BTreeSet<String>> {
    (!set.is_empty()).then_some(set)
}
