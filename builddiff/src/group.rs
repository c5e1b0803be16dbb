use std::collections::BTreeSet;

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};

use crate::error::ConfigurationError;

/// Ordered mapping from a key (e.g. test file) to the values found for it (e.g. failing test
/// cases). Keys keep the order in which they were first seen and never map to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedFailures(IndexMap<String, Vec<String>>);

impl GroupedFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.0
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for GroupedFailures
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<V>)>>(iter: I) -> Self {
        let mut grouped = GroupedFailures::new();
        for (key, values) in iter {
            for value in values {
                grouped.push(key.as_ref(), value.as_ref());
            }
        }
        grouped
    }
}

/// Compile a pattern with python-style flag letters, e.g. `"im"`.
pub fn compile_pattern(pattern: &str, flags: Option<&str>) -> Result<Regex, ConfigurationError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.unwrap_or_default().chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            other => return Err(ConfigurationError::UnknownFlag(other)),
        };
    }
    Ok(builder.build()?)
}

/// Check that the named groups of `regex` are exactly `{key_group, value_group}`.
pub fn validate_groups(
    regex: &Regex,
    key_group: &str,
    value_group: &str,
) -> Result<(), ConfigurationError> {
    let found: BTreeSet<&str> = regex.capture_names().flatten().collect();
    let expected: BTreeSet<&str> = [key_group, value_group].into_iter().collect();

    if found != expected {
        return Err(ConfigurationError::GroupMismatch {
            expected: join_names(&expected),
            found: join_names(&found),
        });
    }
    Ok(())
}

fn join_names(names: &BTreeSet<&str>) -> String {
    if names.is_empty() {
        return "no named groups".to_string();
    }
    names.iter().copied().collect::<Vec<_>>().join(", ")
}

/// Scan `text` for all matches of `regex` and collect the `value_group` captures under their
/// `key_group` capture, in order of appearance.
///
/// ```
/// use builddiff::group::{compile_pattern, group_by_regex};
///
/// let regex = compile_pattern(r"^(?P<file>\w+)\.py\s(?P<case>\w+)$", Some("m")).unwrap();
/// let grouped = group_by_regex("a.py one\na.py two\n", &regex, "file", "case").unwrap();
/// assert_eq!(grouped.get("a"), Some(&["one".to_string(), "two".to_string()][..]));
/// ```
pub fn group_by_regex(
    text: &str,
    regex: &Regex,
    key_group: &str,
    value_group: &str,
) -> Result<GroupedFailures, ConfigurationError> {
    validate_groups(regex, key_group, value_group)?;

    let mut grouped = GroupedFailures::new();
    for caps in regex.captures_iter(text) {
        // Either group can be inside an optional part of the pattern
        if let (Some(key), Some(value)) = (caps.name(key_group), caps.name(value_group)) {
            grouped.push(key.as_str(), value.as_str());
        }
    }
    Ok(grouped)
}
