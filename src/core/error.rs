//! Error types
//!
//! Malformed input never produces an error: it is replaced by an invalid
//! marker. The types here cover the few cases that the caller must see.

use serde_json::Value;

/// Errors raised by the container recursion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanitizeError {
    /// Input nesting is deeper than the configured ceiling
    #[error("input nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

/// Required fields that were absent or empty
///
/// Never empty: a successful check is `Ok(())`, not an empty list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", .0.join(", "))]
pub struct MissingFields(Vec<String>);

impl MissingFields {
    /// `None` when `labels` is empty
    pub fn new(labels: Vec<String>) -> Option<Self> {
        if labels.is_empty() {
            None
        } else {
            Some(Self(labels))
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn into_labels(self) -> Vec<String> {
        self.0
    }

    /// JSON rendering of the report, e.g. `["b"]`
    pub fn to_value(&self) -> Value {
        Value::from(self.0.clone())
    }
}

/// JSON rendering of a required-fields result: `true` or the list of labels
pub fn presence_to_value(result: &Result<(), MissingFields>) -> Value {
    match result {
        Ok(()) => Value::Bool(true),
        Err(missing) => missing.to_value(),
    }
}
