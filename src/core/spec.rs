//! Filter and requirement specifications
//!
//! Both specifications are plain trees built once by the caller and only read
//! by the engine, so they can be shared freely across calls and threads.

use super::validation::LeafFilter;
use indexmap::IndexMap;
use serde_json::Value;

/// How to sanitize a value or container
#[derive(Debug, Clone)]
pub enum FilterSpec {
    /// Apply one leaf filter
    Leaf(LeafFilter),
    /// Apply the inner spec to every element of the container
    Broadcast(Box<FilterSpec>),
    /// Apply a distinct spec per key; the output has exactly these keys
    Keyed(IndexMap<String, FilterSpec>),
    /// Emit this value verbatim (default or constant)
    Literal(Value),
}

impl FilterSpec {
    /// Broadcast `inner` over every element
    pub fn each(inner: impl Into<FilterSpec>) -> Self {
        FilterSpec::Broadcast(Box::new(inner.into()))
    }

    /// Per-key specification
    ///
    /// ```rust,ignore
    /// let spec = FilterSpec::keyed([
    ///     ("name", FilterSpec::from(filters::string())),
    ///     ("tags", FilterSpec::each(filters::string())),
    /// ]);
    /// ```
    pub fn keyed<K, S>(entries: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: Into<String>,
        S: Into<FilterSpec>,
    {
        FilterSpec::Keyed(
            entries
                .into_iter()
                .map(|(key, spec)| (key.into(), spec.into()))
                .collect(),
        )
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        FilterSpec::Literal(value.into())
    }

    /// Build from a positional list of specs
    ///
    /// Exactly one element is the broadcast form. Any other length is a keyed
    /// spec whose keys are the positions `"0"`, `"1"`, ...
    pub fn from_sequence(specs: Vec<FilterSpec>) -> Self {
        if specs.len() == 1 {
            let mut specs = specs;
            return FilterSpec::each(specs.remove(0));
        }
        FilterSpec::Keyed(
            specs
                .into_iter()
                .enumerate()
                .map(|(index, spec)| (index.to_string(), spec))
                .collect(),
        )
    }

    /// True for the broadcast form
    pub fn is_broadcast(&self) -> bool {
        matches!(self, FilterSpec::Broadcast(_))
    }

    /// True for forms that expect a container as input
    pub fn is_container(&self) -> bool {
        matches!(self, FilterSpec::Broadcast(_) | FilterSpec::Keyed(_))
    }
}

impl From<LeafFilter> for FilterSpec {
    fn from(filter: LeafFilter) -> Self {
        FilterSpec::Leaf(filter)
    }
}

/// Which fields must be present and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequireSpec {
    /// A single field; `label` replaces the key in the missing report
    Field {
        required: bool,
        label: Option<String>,
    },
    /// Check every element against the inner requirement
    Each(Box<RequireSpec>),
    /// Per-key requirements
    Keyed(IndexMap<String, RequireSpec>),
}

impl RequireSpec {
    pub fn required() -> Self {
        RequireSpec::Field {
            required: true,
            label: None,
        }
    }

    pub fn optional() -> Self {
        RequireSpec::Field {
            required: false,
            label: None,
        }
    }

    /// A field reported under `label` instead of its key
    pub fn labeled(required: bool, label: impl Into<String>) -> Self {
        RequireSpec::Field {
            required,
            label: Some(label.into()),
        }
    }

    pub fn each(inner: impl Into<RequireSpec>) -> Self {
        RequireSpec::Each(Box::new(inner.into()))
    }

    pub fn keyed<K, S>(entries: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: Into<String>,
        S: Into<RequireSpec>,
    {
        RequireSpec::Keyed(
            entries
                .into_iter()
                .map(|(key, spec)| (key.into(), spec.into()))
                .collect(),
        )
    }

    /// Same positional rule as [`FilterSpec::from_sequence`]
    pub fn from_sequence(specs: Vec<RequireSpec>) -> Self {
        if specs.len() == 1 {
            let mut specs = specs;
            return RequireSpec::each(specs.remove(0));
        }
        RequireSpec::Keyed(
            specs
                .into_iter()
                .enumerate()
                .map(|(index, spec)| (index.to_string(), spec))
                .collect(),
        )
    }

    /// `Field { required: false }` never reports anything
    pub fn is_skipped(&self) -> bool {
        matches!(self, RequireSpec::Field { required: false, .. })
    }

    /// True if any field in this tree is required
    pub fn has_requirements(&self) -> bool {
        match self {
            RequireSpec::Field { required, .. } => *required,
            RequireSpec::Each(inner) => inner.has_requirements(),
            RequireSpec::Keyed(entries) => entries.values().any(RequireSpec::has_requirements),
        }
    }

    /// The label to report instead of the key, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            RequireSpec::Field { label, .. } => label.as_deref(),
            _ => None,
        }
    }
}

impl From<bool> for RequireSpec {
    fn from(required: bool) -> Self {
        RequireSpec::Field {
            required,
            label: None,
        }
    }
}

impl<L: Into<String>> From<(bool, L)> for RequireSpec {
    fn from((required, label): (bool, L)) -> Self {
        RequireSpec::labeled(required, label)
    }
}
