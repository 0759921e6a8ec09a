//! Invalid-value policy
//!
//! Every failure path of the engine (empty input, wrong shape, failed type
//! validation, failed pattern match) ends up here as a [`Rejection`]. The
//! [`InvalidPolicy`] decides which marker value replaces the rejected input.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The type a filter or spec entry was expecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expected {
    Boolean,
    Integer,
    Double,
    Float,
    String,
    Filename,
    Filepath,
    Url,
    Email,
    Year,
    Timestamp,
    Date,
    DateTime,
    Custom,
    /// A sequence-shaped expectation (broadcast spec)
    Array,
    /// A mapping-shaped expectation (keyed spec)
    Object,
}

impl Expected {
    pub fn name(self) -> &'static str {
        match self {
            Expected::Boolean => "Boolean",
            Expected::Integer => "Integer",
            Expected::Double => "Double",
            Expected::Float => "Float",
            Expected::String => "String",
            Expected::Filename => "Filename",
            Expected::Filepath => "Filepath",
            Expected::Url => "URL",
            Expected::Email => "Email",
            Expected::Year => "Year",
            Expected::Timestamp => "Timestamp",
            Expected::Date => "Date",
            Expected::DateTime => "DateTime",
            Expected::Custom => "Custom",
            Expected::Array => "Array",
            Expected::Object => "Object",
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of value that was actually received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Received {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl Received {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Received::Null,
            Value::Bool(_) => Received::Boolean,
            Value::Number(_) => Received::Number,
            Value::String(_) => Received::String,
            Value::Array(_) => Received::Array,
            Value::Object(_) => Received::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Received::Null => "Null",
            Received::Boolean => "Boolean",
            Received::Number => "Number",
            Received::String => "String",
            Received::Array => "Array",
            Received::Object => "Object",
        }
    }
}

impl fmt::Display for Received {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a value was replaced by an invalid marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rejection {
    pub expected: Option<Expected>,
    pub received: Option<Received>,
}

impl Rejection {
    /// Nothing usable was there at all
    pub fn no_data() -> Self {
        Self::default()
    }

    /// The value failed sanitization or validation for `expected`
    pub fn invalid(expected: Expected) -> Self {
        Self {
            expected: Some(expected),
            received: None,
        }
    }

    /// The value had the wrong shape for `expected`
    pub fn wrong_shape(expected: Option<Expected>, value: &Value) -> Self {
        Self {
            expected,
            received: Some(Received::of(value)),
        }
    }

    /// Record the offending input kind
    pub fn received(mut self, value: &Value) -> Self {
        self.received = Some(Received::of(value));
        self
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.expected, self.received) {
            (None, None) => write!(f, "No data"),
            (None, Some(received)) => write!(f, "Invalid ({})", received),
            (Some(expected), None) => write!(f, "Invalid. Expected: {}", expected),
            (Some(expected), Some(received)) => {
                write!(f, "Invalid. Expected: {} ({})", expected, received)
            }
        }
    }
}

/// Selects the marker that replaces a rejected value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPolicy {
    /// `null`, or `[]` where a sequence was expected
    #[default]
    Null,
    /// A short human-readable message such as `"Invalid. Expected: Integer"`
    Verbose,
}

impl InvalidPolicy {
    pub fn marker(self, rejection: &Rejection) -> Value {
        match self {
            InvalidPolicy::Null => match rejection.expected {
                Some(Expected::Array) => Value::Array(Vec::new()),
                _ => Value::Null,
            },
            InvalidPolicy::Verbose => Value::String(rejection.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_policy_scalar_marker_is_null() {
        let marker = InvalidPolicy::Null.marker(&Rejection::invalid(Expected::Integer));
        assert_eq!(marker, Value::Null);
    }

    #[test]
    fn test_null_policy_array_marker_is_empty_sequence() {
        let marker = InvalidPolicy::Null.marker(&Rejection::invalid(Expected::Array));
        assert_eq!(marker, json!([]));
    }

    #[test]
    fn test_null_policy_object_marker_is_null() {
        let marker = InvalidPolicy::Null.marker(&Rejection::invalid(Expected::Object));
        assert_eq!(marker, Value::Null);
    }

    #[test]
    fn test_marker_depends_on_expected_not_received() {
        let rejection = Rejection::wrong_shape(Some(Expected::String), &json!([1, 2]));
        assert_eq!(InvalidPolicy::Null.marker(&rejection), Value::Null);
    }

    #[test]
    fn test_verbose_no_data() {
        let marker = InvalidPolicy::Verbose.marker(&Rejection::no_data());
        assert_eq!(marker, json!("No data"));
    }

    #[test]
    fn test_verbose_received_only() {
        let rejection = Rejection::wrong_shape(None, &json!({"a": 1}));
        assert_eq!(InvalidPolicy::Verbose.marker(&rejection), json!("Invalid (Object)"));
    }

    #[test]
    fn test_verbose_expected_and_received() {
        let rejection = Rejection::invalid(Expected::Url).received(&json!("x"));
        assert_eq!(
            InvalidPolicy::Verbose.marker(&rejection),
            json!("Invalid. Expected: URL (String)")
        );
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: InvalidPolicy = serde_json::from_str(r#""verbose""#).expect("should parse");
        assert_eq!(policy, InvalidPolicy::Verbose);
        assert_eq!(InvalidPolicy::default(), InvalidPolicy::Null);
    }
}
