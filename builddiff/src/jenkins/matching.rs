use regex::Regex;

use crate::error::ConfigurationError;

use super::{Build, BUILD_TREE};

/// A `FIELD=REGEX` filter on builds.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub field: String,
    pub regex: Regex,
}

impl FieldPattern {
    /// Parse `FIELD=REGEX`. The field has to be one of the fields requested for builds.
    pub fn parse(filter: &str) -> Result<Self, ConfigurationError> {
        let (field, pattern) = filter
            .split_once('=')
            .filter(|(field, _)| !field.is_empty())
            .ok_or_else(|| ConfigurationError::InvalidFilter(filter.to_string()))?;

        if !BUILD_TREE.contains(&field) {
            return Err(ConfigurationError::UnknownField(field.to_string()));
        }

        Ok(Self {
            field: field.to_string(),
            regex: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.find(value).map_or(false, |m| m.start() == 0)
    }
}

/// Builds whose fields match all of the given patterns. A pattern has to match at the start of the
/// field value. A build without a value for a field does not match.
pub fn matching_builds<'a>(builds: &'a [Build], patterns: &[FieldPattern]) -> Vec<&'a Build> {
    builds
        .iter()
        .filter(|build| {
            patterns.iter().all(|pattern| {
                build
                    .field(&pattern.field)
                    .map_or(false, |value| pattern.matches(&value))
            })
        })
        .collect()
}
