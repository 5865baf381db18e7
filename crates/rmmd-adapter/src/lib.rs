#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rmmd-adapter
//!
//! File-format adapters for RMMD documents.
//!
//! JSON and YAML text is turned into a [`rmmd_ir::Value`] tree; the
//! validation engine never touches files itself. The [`fixture`] module
//! reads the two-document YAML files used to exercise the schema.

pub mod fixture;
pub mod loader;

pub use fixture::{Fixture, FixtureMetadata, fixture_files, load_fixture};
pub use loader::{Format, from_json_str, from_yaml_str, load_file, load_typed};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading documents
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("Unsupported file extension for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid fixture {path}: {message}")]
    Fixture { path: PathBuf, message: String },
}

impl AdapterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn fixture(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Fixture {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
