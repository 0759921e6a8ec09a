//! Container sanitizer
//!
//! Walks an input tree in lock-step with a [`FilterSpec`] and builds the
//! parallel output tree. Dispatch per node:
//!
//! - **Broadcast** (`FilterSpec::Broadcast`, or a bare leaf at container level):
//!   the inner spec is applied to every element present in the input. The
//!   output has the input's keys and representation.
//! - **Keyed** (`FilterSpec::Keyed`): every key of the spec is looked up in the
//!   input. The output is a mapping with exactly the spec's keys. A key whose
//!   value is `null` counts as absent.
//! - **Leaf**: the filter runs on the value directly.
//! - **Literal**: the literal is emitted as-is.
//!
//! Failures never escape as errors. They are carried as [`Rejection`]s and
//! turned into markers by the configured [`InvalidPolicy`](crate::core::policy::InvalidPolicy).

use super::container::{self, is_container};
use super::error::SanitizeError;
use super::flags::{Flag, Flags};
use super::json::maybe_decode_json;
use super::policy::{Expected, Rejection};
use super::spec::FilterSpec;
use super::validation::LeafFilter;
use crate::config::SanitizerConfig;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Result of filtering one node before the marker policy is applied
pub(crate) type Filtered = Result<Value, Rejection>;

/// The sanitization and required-field engine
///
/// Holds only read-only configuration; a single instance can be shared across
/// threads and reused for any number of calls.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    config: SanitizerConfig,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Apply one leaf filter to one value
    ///
    /// With [`Flag::ExpectJson`] a JSON-encoded string is decoded first.
    pub fn sanitize_variable(
        &self,
        value: &Value,
        filter: &LeafFilter,
        flags: impl Into<Flags>,
    ) -> Value {
        let flags = self.effective_flags(flags.into());
        let value = self.decode(value, flags);
        self.resolve(filter.apply(&value, flags))
    }

    /// Sanitize a container against a filter specification
    ///
    /// Never fails: if the input is nested deeper than the configured limit
    /// the whole result is the invalid marker.
    pub fn sanitize_container(
        &self,
        container: &Value,
        spec: &FilterSpec,
        flags: impl Into<Flags>,
    ) -> Value {
        match self.try_sanitize_container(container, spec, flags) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "container sanitization aborted");
                self.resolve(Err(Rejection::no_data()))
            }
        }
    }

    /// Like [`Sanitizer::sanitize_container`] but reports a depth overflow
    pub fn try_sanitize_container(
        &self,
        container: &Value,
        spec: &FilterSpec,
        flags: impl Into<Flags>,
    ) -> Result<Value, SanitizeError> {
        let flags = self.effective_flags(flags.into());
        let container = self.decode(container, flags);
        let filtered = self.container(&container, spec, flags, 0)?;
        Ok(self.resolve(filtered))
    }

    pub(crate) fn effective_flags(&self, flags: Flags) -> Flags {
        self.config.default_flags.union(flags)
    }

    pub(crate) fn decode<'a>(&self, value: &'a Value, flags: Flags) -> Cow<'a, Value> {
        if flags.contains(Flag::ExpectJson) {
            maybe_decode_json(value)
        } else {
            Cow::Borrowed(value)
        }
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), SanitizeError> {
        if depth >= self.config.max_depth {
            return Err(SanitizeError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    fn resolve(&self, filtered: Filtered) -> Value {
        match filtered {
            Ok(value) => value,
            Err(rejection) => self.config.invalid_policy.marker(&rejection),
        }
    }

    fn container(
        &self,
        value: &Value,
        spec: &FilterSpec,
        flags: Flags,
        depth: usize,
    ) -> Result<Filtered, SanitizeError> {
        self.check_depth(depth)?;

        match spec {
            FilterSpec::Literal(literal) => Ok(Ok(literal.clone())),
            _ if value.is_null() => Ok(Err(Rejection::no_data())),
            FilterSpec::Leaf(_) => self.broadcast(value, spec, flags, depth),
            FilterSpec::Broadcast(inner) => self.broadcast(value, inner, flags, depth),
            FilterSpec::Keyed(entries) => self.keyed(value, entries, flags, depth),
        }
    }

    fn broadcast(
        &self,
        value: &Value,
        inner: &FilterSpec,
        flags: Flags,
        depth: usize,
    ) -> Result<Filtered, SanitizeError> {
        tracing::trace!(depth, "broadcast dispatch");
        let mut usable = 0usize;

        let output = match value {
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, item) in map {
                    let filtered = self.element(item, inner, flags, depth)?;
                    usable += usize::from(is_usable(&filtered));
                    out.insert(key.clone(), self.resolve(filtered));
                }
                Value::Object(out)
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let filtered = self.element(item, inner, flags, depth)?;
                    usable += usize::from(is_usable(&filtered));
                    out.push(self.resolve(filtered));
                }
                Value::Array(out)
            }
            scalar => {
                let filtered = self.element(scalar, inner, flags, depth)?;
                usable += usize::from(is_usable(&filtered));
                Value::Array(vec![self.resolve(filtered)])
            }
        };

        if usable == 0 && !container::is_empty_value(&output) {
            tracing::debug!(depth, "broadcast produced no usable data");
            return Ok(Err(Rejection::no_data()));
        }
        Ok(Ok(output))
    }

    fn element(
        &self,
        item: &Value,
        inner: &FilterSpec,
        flags: Flags,
        depth: usize,
    ) -> Result<Filtered, SanitizeError> {
        let item = self.decode(item, flags);
        if item.is_null() {
            return Ok(Err(Rejection::no_data()));
        }

        match inner {
            FilterSpec::Literal(literal) => Ok(Ok(literal.clone())),
            FilterSpec::Leaf(filter) if is_container(&item) => {
                if flags.contains(Flag::DeepRecursion) {
                    self.container(&item, inner, flags, depth + 1)
                } else {
                    Ok(Err(Rejection::wrong_shape(filter.expected(), &item)))
                }
            }
            FilterSpec::Leaf(filter) => Ok(filter.apply(&item, flags)),
            FilterSpec::Broadcast(_) | FilterSpec::Keyed(_) if is_container(&item) => {
                self.container(&item, inner, flags, depth + 1)
            }
            FilterSpec::Broadcast(_) | FilterSpec::Keyed(_) => {
                Ok(Err(Rejection::wrong_shape(Some(container_shape(inner)), &item)))
            }
        }
    }

    fn keyed(
        &self,
        value: &Value,
        entries: &IndexMap<String, FilterSpec>,
        flags: Flags,
        depth: usize,
    ) -> Result<Filtered, SanitizeError> {
        tracing::trace!(depth, keys = entries.len(), "keyed dispatch");
        let mut out = Map::new();

        for (key, entry) in entries {
            let filtered = match container::lookup(value, key) {
                None | Some(Value::Null) => absent(entry),
                Some(item) => self.entry(item, entry, flags, depth)?,
            };
            out.insert(key.clone(), self.resolve(filtered));
        }

        Ok(Ok(Value::Object(out)))
    }

    fn entry(
        &self,
        item: &Value,
        entry: &FilterSpec,
        flags: Flags,
        depth: usize,
    ) -> Result<Filtered, SanitizeError> {
        let item = self.decode(item, flags);
        match entry {
            FilterSpec::Literal(literal) => Ok(Ok(literal.clone())),
            FilterSpec::Leaf(filter) => Ok(filter.apply(&item, flags)),
            FilterSpec::Broadcast(_) | FilterSpec::Keyed(_) => {
                self.container(&item, entry, flags, depth + 1)
            }
        }
    }
}

/// Marker choice for a key the input does not have
fn absent(entry: &FilterSpec) -> Filtered {
    match entry {
        FilterSpec::Literal(literal) => Ok(literal.clone()),
        FilterSpec::Leaf(filter) => Err(Rejection {
            expected: filter.expected(),
            received: None,
        }),
        FilterSpec::Broadcast(_) | FilterSpec::Keyed(_) => {
            Err(Rejection::invalid(container_shape(entry)))
        }
    }
}

fn container_shape(spec: &FilterSpec) -> Expected {
    if spec.is_broadcast() {
        Expected::Array
    } else {
        Expected::Object
    }
}

/// Counts toward a non-empty broadcast result
fn is_usable(filtered: &Filtered) -> bool {
    match filtered {
        Ok(value) => !(is_container(value) && container::is_empty_value(value)),
        Err(_) => false,
    }
}
