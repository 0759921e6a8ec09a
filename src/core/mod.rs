//! Core module containing the sanitization engine and its types

pub mod container;
pub mod error;
pub mod flags;
pub mod json;
pub mod policy;
pub mod required;
pub mod sanitizer;
pub mod spec;
pub mod validation;

pub use error::{MissingFields, SanitizeError, presence_to_value};
pub use flags::{Flag, Flags, UnknownFlag};
pub use json::maybe_decode_json;
pub use policy::{Expected, InvalidPolicy, Received, Rejection};
pub use sanitizer::Sanitizer;
pub use spec::{FilterSpec, RequireSpec};
pub use validation::{LeafFilter, LeafKind};
