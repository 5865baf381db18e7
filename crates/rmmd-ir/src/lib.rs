#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rmmd-ir
//!
//! Format-neutral tree for RMMD documents.
//!
//! File-format adapters (JSON, YAML) deserialize into [`Value`] before the
//! validation engine sees anything. Mappings keep their entries in source
//! order and keep repeated keys, so the engine can report duplicates that a
//! plain hash map would silently collapse.

/// Structured locations inside a document tree.
pub mod path;
/// Generic scalar/sequence/mapping tree.
pub mod value;

/// Field path primitives used by error reporting.
pub use path::{FieldPath, PathSegment};
/// Tree primitives.
pub use value::{Mapping, Value};
