//! Leaf filters and the validation predicates behind them
//!
//! [`filters`] holds the public constructors (`filters::string()`,
//! `filters::integer()`, ...) that callers compose into a
//! [`FilterSpec`](crate::core::spec::FilterSpec).

pub mod charset;
pub mod filters;
pub mod validators;

pub use filters::{LeafFilter, LeafKind};
