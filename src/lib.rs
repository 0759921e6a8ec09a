//! # Sanitize-RS
//!
//! Recursive sanitization and required-field validation for loosely-typed,
//! externally supplied data: form submissions, JSON payloads, query parameters.
//!
//! ## Features
//!
//! - **Leaf Filters**: string, integer, double, float, boolean, filename, filepath,
//!   URL, email, year, timestamp, date, datetime, raw and custom
//! - **Container Sanitizer**: broadcast one filter over every element, or declare a
//!   filter per key; nested to any depth
//! - **Required Fields**: report which required paths are absent or empty
//! - **JSON Auto-Decode**: JSON-encoded strings become structures before filtering
//! - **Invalid Markers**: `null` (or `[]` for lists), or verbose messages
//! - **Configuration-Based**: policy, depth ceiling and default flags via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sanitize::prelude::*;
//! use serde_json::json;
//!
//! let spec = FilterSpec::keyed([
//!     ("name", FilterSpec::from(filters::string())),
//!     ("age", FilterSpec::from(filters::integer().with(Flag::OnlyPositive))),
//!     ("tags", FilterSpec::each(filters::string())),
//! ]);
//!
//! let clean = sanitize_container(&json!({"name": " <b>Ada</b> ", "age": "36"}), &spec, Flags::empty());
//! assert_eq!(clean, json!({"name": "Ada", "age": 36, "tags": []}));
//!
//! let required = RequireSpec::keyed([("name", true), ("email", true)]);
//! assert!(find_missing_fields(&clean, &required, Flags::empty()).is_err());
//! ```

pub mod config;
pub mod core;

pub use crate::core::validation::filters;

use crate::core::{FilterSpec, Flags, LeafFilter, MissingFields, RequireSpec, Sanitizer};
use serde_json::Value;

/// Apply one leaf filter to one value with the default configuration
pub fn sanitize_variable(value: &Value, filter: &LeafFilter, flags: impl Into<Flags>) -> Value {
    Sanitizer::default().sanitize_variable(value, filter, flags)
}

/// Sanitize a container with the default configuration
pub fn sanitize_container(container: &Value, spec: &FilterSpec, flags: impl Into<Flags>) -> Value {
    Sanitizer::default().sanitize_container(container, spec, flags)
}

/// Check required fields with the default configuration
pub fn find_missing_fields(
    container: &Value,
    spec: &RequireSpec,
    flags: impl Into<Flags>,
) -> Result<(), MissingFields> {
    Sanitizer::default().find_missing_fields(container, spec, flags)
}

/// Re-exports of commonly used types and functions
pub mod prelude {
    // === Engine ===
    pub use crate::core::{
        error::{MissingFields, SanitizeError, presence_to_value},
        flags::{Flag, Flags},
        json::maybe_decode_json,
        policy::{InvalidPolicy, Rejection},
        sanitizer::Sanitizer,
        spec::{FilterSpec, RequireSpec},
        validation::{LeafFilter, LeafKind},
    };

    // === Entry points ===
    pub use crate::{filters, find_missing_fields, sanitize_container, sanitize_variable};

    // === Config ===
    pub use crate::config::SanitizerConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use serde_json::Value;
}
