//! Validation engine

use crate::config::{ReferenceCheck, ValidationConfig};
use crate::context::Context;
use crate::entity::{Entity, SchemaPart};
use crate::error::{ErrorKind, ValidationError, ValidationReport};
use crate::references;
use rmmd_ir::{FieldPath, Value};
use rmmd_schema::Document;
use tracing::debug;

/// Main validation engine
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create a new validation engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific configuration
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a complete document.
    ///
    /// Structural validation collects every error in the tree. When it
    /// succeeds and references are strict, a second pass checks that every
    /// point id, calculation id and citation key resolves.
    ///
    /// # Errors
    ///
    /// Returns every collected error when the document is invalid.
    pub fn validate(&self, value: &Value) -> Result<Document, ValidationReport> {
        let mut ctx = Context::new();

        debug!("Structural validation pass");
        let document = Document::validate(value, &mut ctx);

        if let Some(document) = &document {
            if !ctx.has_errors() && self.config.references == ReferenceCheck::Strict {
                debug!(
                    points = document.points.len(),
                    calculations = document.calculations.len(),
                    "Cross-reference pass"
                );
                references::check(document, &mut ctx);
            }
        }

        let document = self.finish(document, ctx)?;
        debug!(species = document.species.len(), "Document is valid");
        Ok(document)
    }

    /// Validate a value as a single entity, without the cross-reference pass
    ///
    /// # Errors
    ///
    /// Returns every collected error when the value is invalid.
    pub fn validate_entity<T: Entity>(&self, value: &Value) -> Result<T, ValidationReport> {
        let mut ctx = Context::new();
        debug!(entity = T::NAME, "Validating fragment");
        let entity = T::validate(value, &mut ctx);
        self.finish(entity, ctx)
    }

    /// Validate a value as the named part. `Document` runs the full
    /// pipeline; other parts are validated structurally.
    ///
    /// # Errors
    ///
    /// Returns every collected error when the value is invalid.
    pub fn check_part(&self, part: SchemaPart, value: &Value) -> Result<(), ValidationReport> {
        if part == SchemaPart::Document {
            return self.validate(value).map(|_| ());
        }

        let mut ctx = Context::new();
        debug!(part = part.name(), "Validating fragment");
        part.check(value, &mut ctx);
        self.finish(Some(()), ctx)
    }

    /// `Ok` only for a result with no errors recorded alongside it
    fn finish<T>(&self, result: Option<T>, ctx: Context) -> Result<T, ValidationReport> {
        let mut errors = ctx.into_errors().into_iter();
        match (result, errors.next()) {
            (Some(value), None) => Ok(value),
            (_, Some(first)) => Err(self.report(first, errors.collect())),
            (None, None) => Err(self.report(
                ValidationError::new(
                    ErrorKind::InvalidFormat,
                    FieldPath::root(),
                    "value could not be validated",
                ),
                Vec::new(),
            )),
        }
    }

    fn report(&self, first: ValidationError, mut rest: Vec<ValidationError>) -> ValidationReport {
        let total = rest.len() + 1;
        if self.config.max_errors > 0 && total > self.config.max_errors {
            debug!(total, kept = self.config.max_errors, "Truncating error list");
            rest.truncate(self.config.max_errors - 1);
        }
        ValidationReport::starting_with(first, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmmd_adapter::from_yaml_str;
    use rmmd_schema::ElectronicState;

    const MINIMAL: &str = "\
species:
  CH4:
    entities:
      - constitution: {element_count: {C: 1, H: 4}}
        connectivity: {}
reactions: []
points: []
calculations: []
schema_version: 1.0.0b0
license: CC-BY-4.0
";

    fn yaml(text: &str) -> Value {
        from_yaml_str(text).unwrap()
    }

    #[test]
    fn test_validate_minimal_document() {
        let engine = ValidationEngine::new();
        let document = engine.validate(&yaml(MINIMAL)).unwrap();
        assert_eq!(document.species.len(), 1);
        assert_eq!(document.license, "CC-BY-4.0");
    }

    #[test]
    fn test_missing_license() {
        let engine = ValidationEngine::new();
        let report = engine
            .validate(&yaml("schema_version: 1.0.0b0\n"))
            .unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].code(), "MISSING_REQUIRED_FIELD");
        assert_eq!(report.errors()[0].path.to_string(), "license");
    }

    #[test]
    fn test_non_mapping_document() {
        let report = ValidationEngine::new().validate(&yaml("[1, 2]")).unwrap_err();
        assert_eq!(report.errors()[0].to_string(), "<root>: expected mapping, found sequence");
    }

    #[test]
    fn test_deferred_references() {
        let text = "schema_version: 1.0.0b0\nlicense: MIT\nreferences: [nowhere]\n";

        let strict = ValidationEngine::new().validate(&yaml(text)).unwrap_err();
        assert_eq!(strict.errors()[0].code(), "DANGLING_REFERENCE");

        let deferred = ValidationEngine::with_config(ValidationConfig::deferred());
        assert!(deferred.validate(&yaml(text)).is_ok());
    }

    #[test]
    fn test_max_errors_truncates() {
        let text = "schema_version: 0.1\nlicense: ''\nspecies: {1a: {entities: []}}\n";

        let all = ValidationEngine::new().validate(&yaml(text)).unwrap_err();
        assert_eq!(all.len(), 4);

        let engine = ValidationEngine::with_config(ValidationConfig {
            max_errors: 2,
            ..ValidationConfig::default()
        });
        let truncated = engine.validate(&yaml(text)).unwrap_err();
        assert_eq!(truncated.len(), 2);
        assert_eq!(truncated.errors(), &all.errors()[..2]);

        let single = ValidationEngine::with_config(ValidationConfig {
            max_errors: 1,
            ..ValidationConfig::default()
        });
        assert_eq!(single.validate(&yaml(text)).unwrap_err().len(), 1);
    }

    #[test]
    fn test_validate_entity() {
        let engine = ValidationEngine::new();
        let state: ElectronicState = engine
            .validate_entity(&yaml("charge: -1\nspin: 1.5\n"))
            .unwrap();
        assert_eq!(state.spin_multiplicity(), 4);

        let report = engine
            .validate_entity::<ElectronicState>(&yaml("charge: 0\n"))
            .unwrap_err();
        assert_eq!(report.errors()[0].path.to_string(), "spin");
    }

    #[test]
    fn test_check_part() {
        let engine = ValidationEngine::new();
        let ts = yaml("type: transition state\norder: 2\npoint: 0\n");
        let report = engine.check_part(SchemaPart::SaddlePoint, &ts).unwrap_err();
        assert_eq!(report.errors()[0].path.to_string(), "order");

        // fragments skip the cross-reference pass
        let well = yaml("type: unimolecular well\npoint: 99\n");
        assert!(engine.check_part(SchemaPart::Well, &well).is_ok());

        assert!(engine.check_part(SchemaPart::Document, &yaml(MINIMAL)).is_ok());
    }
}
