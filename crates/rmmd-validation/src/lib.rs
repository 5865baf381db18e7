#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rmmd-validation
//!
//! Validation engine for RMMD documents.
//!
//! Raw [`rmmd_ir::Value`] trees are checked in two passes. The structural
//! pass walks the tree and collects every error, with its path, instead of
//! stopping at the first one. When the structure is sound, the reference
//! pass checks that integer ids and citation keys resolve within the
//! document. Only a document passing both becomes an
//! [`rmmd_schema::Document`].
//!
//! ## Example Usage
//!
//! ```rust
//! use rmmd_validation::ValidationEngine;
//!
//! let value = rmmd_adapter::from_yaml_str(
//!     "schema_version: 1.0.0b0\nlicense: CC-BY-4.0\npoints: []\n",
//! )
//! .unwrap();
//!
//! let document = ValidationEngine::new().validate(&value).unwrap();
//! assert!(document.points.is_empty());
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod entity;
pub mod error;
pub mod harness;
pub mod references;
pub mod reporter;
pub mod rules;
pub mod union;

// Re-export main types
pub use config::{ReferenceCheck, ValidationConfig};
pub use context::Context;
pub use engine::ValidationEngine;
pub use entity::{Entity, SchemaPart};
pub use error::{ErrorKind, ReferenceTarget, ValidationError, ValidationReport, VariantAttempt};
pub use harness::check_fixture;
pub use reporter::{OutputFormat, ValidationReporter};

use thiserror::Error;

/// Errors outside the validation findings themselves
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown schema part '{0}'")]
    UnknownSchemaPart(String),

    #[error("invalid failure pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("expected success, got {0}")]
    UnexpectedFailure(ValidationReport),

    #[error("fixture {0} validated but a failure was expected")]
    UnexpectedSuccess(String),

    #[error("no error matches '{pattern}'; got {report}")]
    FailureMismatch {
        pattern: String,
        report: ValidationReport,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to validate a document with default settings
///
/// # Errors
///
/// Returns every collected error when the document is invalid.
pub fn validate(value: &rmmd_ir::Value) -> std::result::Result<rmmd_schema::Document, ValidationReport> {
    ValidationEngine::new().validate(value)
}
