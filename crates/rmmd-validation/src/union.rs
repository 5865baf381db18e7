//! Discriminated-union resolution
//!
//! Tagged unions pick their variant from a literal `type` field before any
//! structural check runs. Structural unions have no tag: candidates are
//! tried in declared order and the first one that validates cleanly wins.
//! Repeated keys are reported once, by the variant that reads the mapping,
//! and never decide which candidate matches.

use crate::context::Context;
use crate::error::{ErrorKind, VariantAttempt};
use crate::rules;
use rmmd_ir::Value;
use tracing::trace;

/// Validator producing the union type from a raw value
pub type VariantFn<T> = fn(&Value, &mut Context) -> Option<T>;

/// A variant of a tagged union and its literal tag
pub struct Variant<T> {
    pub tag: &'static str,
    pub validate: VariantFn<T>,
}

/// Union discriminated by a literal string field
pub struct TaggedUnion<T: 'static> {
    pub name: &'static str,
    pub field: &'static str,
    pub variants: &'static [Variant<T>],
}

impl<T: 'static> TaggedUnion<T> {
    /// Known tags in declaration order
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        self.variants.iter().map(|v| v.tag).collect()
    }

    pub fn resolve(&self, value: &Value, ctx: &mut Context) -> Option<T> {
        // the variant scans the mapping itself, including for repeated keys
        let Some(map) = value.as_mapping() else {
            rules::type_mismatch(ctx, "mapping", value);
            return None;
        };

        let tag = rules::required(map, self.field, ctx, |tag, ctx| {
            let tag = rules::string(tag, ctx)?;
            let found = self.variants.iter().find(|v| v.tag == tag);
            if found.is_none() {
                let expected = self.tags();
                let message = format!(
                    "unknown {} type '{tag}', expected one of: {}",
                    self.name,
                    expected.join(", ")
                );
                ctx.report(
                    ErrorKind::UnknownVariant {
                        union: self.name,
                        tag,
                        expected,
                    },
                    message,
                );
            }
            found
        })?;

        trace!(union = self.name, tag = tag.tag, "Resolved tagged variant");
        (tag.validate)(value, ctx)
    }
}

/// Named candidate of a structural union
pub struct Candidate<T> {
    pub name: &'static str,
    pub validate: VariantFn<T>,
}

/// Union without a tag, resolved by trying each candidate in order
pub struct StructuralUnion<T: 'static> {
    pub name: &'static str,
    pub candidates: &'static [Candidate<T>],
}

impl<T: 'static> StructuralUnion<T> {
    /// First candidate whose only errors, if any, are repeated keys. Those
    /// are kept in `ctx`. When no candidate qualifies, a single
    /// `NoMatchingVariant` error carries every attempt's errors.
    pub fn resolve(&self, value: &Value, ctx: &mut Context) -> Option<T> {
        let mut attempts = Vec::with_capacity(self.candidates.len());

        for candidate in self.candidates {
            let mut attempt = ctx.fork();
            let result = (candidate.validate)(value, &mut attempt);
            let errors = attempt.into_errors();
            if errors.iter().all(|e| matches!(e.kind, ErrorKind::DuplicateKey)) {
                trace!(union = self.name, variant = candidate.name, "Resolved structural variant");
                ctx.absorb(errors);
                return result;
            }
            attempts.push(VariantAttempt {
                variant: candidate.name,
                errors,
            });
        }

        let details: Vec<String> = attempts
            .iter()
            .map(|attempt| {
                let errors: Vec<String> = attempt.errors.iter().map(ToString::to_string).collect();
                format!("{} [{}]", attempt.variant, errors.join("; "))
            })
            .collect();
        let message = format!(
            "value matches no variant of {}: {}",
            self.name,
            details.join(", ")
        );
        ctx.report(
            ErrorKind::NoMatchingVariant {
                union: self.name,
                attempts,
            },
            message,
        );
        None
    }
}
