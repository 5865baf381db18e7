//! Fixture checks: run a [`Fixture`] through the engine and compare the
//! outcome with its metadata

use crate::engine::ValidationEngine;
use crate::entity::SchemaPart;
use crate::{Error, Result};
use regex::Regex;
use rmmd_adapter::Fixture;
use tracing::debug;

/// Validate the fixture data as its schema part.
///
/// A fixture without a `failure` pattern must validate. Otherwise validation
/// must fail and at least one error, rendered as `path: message`, must match
/// the pattern.
///
/// # Errors
///
/// Returns an error describing how the outcome differs from the metadata.
pub fn check_fixture(engine: &ValidationEngine, fixture: &Fixture) -> Result<()> {
    let part: SchemaPart = fixture.metadata.schema_part.parse()?;
    let outcome = engine.check_part(part, &fixture.data);
    let name = fixture.relative_path.display().to_string();
    debug!(fixture = %name, part = %part, ok = outcome.is_ok(), "Checked fixture");

    match (&fixture.metadata.failure, outcome) {
        (None, Ok(())) => Ok(()),
        (None, Err(report)) => Err(Error::UnexpectedFailure(report)),
        (Some(_), Ok(())) => Err(Error::UnexpectedSuccess(name)),
        (Some(pattern), Err(report)) => {
            let re = Regex::new(pattern).map_err(|source| Error::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            if report.iter().any(|error| re.is_match(&error.to_string())) {
                Ok(())
            } else {
                Err(Error::FailureMismatch {
                    pattern: pattern.clone(),
                    report,
                })
            }
        }
    }
}
