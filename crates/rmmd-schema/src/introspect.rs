//! Declarative description of the document structure as JSON Schema, for
//! editor tooling and third-party consumers.

use crate::document::Document;
use schemars::{Schema, schema_for};

/// JSON Schema of the document root, with every entity as a definition
#[must_use]
pub fn document_schema() -> Schema {
    schema_for!(Document)
}
