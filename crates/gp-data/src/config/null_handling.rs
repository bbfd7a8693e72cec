//! Missing-value markers recognised while loading tables

use serde::{Serialize, Deserialize};

/// Which cell texts count as a missing observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Cell texts read as null
    pub patterns: Vec<String>,

    /// Ignore surrounding whitespace
    pub trim_whitespace: bool,

    /// Match patterns exactly instead of ignoring ASCII case
    pub case_sensitive: bool,
}

/// Markers used by common statistics exports (R, pandas, spreadsheets)
const DEFAULT_MARKERS: &[&str] = &["", "-", "N/A", "NA", "NaN", "null", "None"];

impl Default for NullConfig {
    fn default() -> Self {
        Self::from_patterns(DEFAULT_MARKERS.iter().copied())
    }
}

impl NullConfig {
    /// Null handling with the given markers, trimmed and case-insensitive
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self {
            patterns: Vec::new(),
            trim_whitespace: true,
            case_sensitive: false,
        };
        for pattern in patterns {
            config.add_pattern(pattern);
        }
        config
    }

    /// Only empty cells are null; `NA` or `NaN` stay as text
    pub fn strict() -> Self {
        Self::from_patterns([""])
    }

    /// Builder-style [`add_pattern`](Self::add_pattern)
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.add_pattern(pattern);
        self
    }

    /// Whether `value` is a missing observation
    pub fn is_null(&self, value: &str) -> bool {
        let cell = if self.trim_whitespace { value.trim() } else { value };
        self.patterns.iter().any(|p| self.matches(cell, p))
    }

    fn matches(&self, cell: &str, pattern: &str) -> bool {
        if self.case_sensitive {
            cell == pattern
        } else {
            cell.eq_ignore_ascii_case(pattern)
        }
    }

    /// Register another marker; duplicates are ignored
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    pub fn remove_pattern(&mut self, pattern: &str) {
        self.patterns.retain(|p| p != pattern);
    }
}
