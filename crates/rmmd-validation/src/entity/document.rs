//! Document root

use super::Entity;
use crate::context::Context;
use crate::error::ErrorKind;
use crate::rules::{
    constrained, defaulted, keyed, mapping, non_empty_string, optional, required, sequence_of,
    string,
};
use rmmd_ir::Value;
use rmmd_schema::{
    Citation, CitationKey, Document, Point, QcCalculation, Reaction, Reference, SCHEMA_VERSION,
    SchemaVersion, Species, SpeciesName,
};

fn schema_version(value: &Value, ctx: &mut Context) -> Option<SchemaVersion> {
    let found = string(value, ctx)?;
    if found == SCHEMA_VERSION {
        return Some(SchemaVersion);
    }
    let message = format!("unsupported schema version '{found}', expected '{SCHEMA_VERSION}'");
    ctx.report(
        ErrorKind::VersionMismatch {
            found,
            expected: SCHEMA_VERSION,
        },
        message,
    );
    None
}

impl Entity for Document {
    const NAME: &'static str = "Document";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;

        let species = defaulted(map, "species", ctx, |v, ctx| {
            keyed(v, ctx, SpeciesName::parse, Species::validate)
        });
        let reactions = defaulted(map, "reactions", ctx, |v, ctx| {
            sequence_of(v, ctx, Reaction::validate)
        });
        let points = defaulted(map, "points", ctx, |v, ctx| {
            sequence_of(v, ctx, Point::validate)
        });
        let calculations = defaulted(map, "calculations", ctx, |v, ctx| {
            sequence_of(v, ctx, QcCalculation::validate)
        });
        let schema_version = required(map, "schema_version", ctx, schema_version);
        let license = required(map, "license", ctx, non_empty_string);
        let preferred_citation = optional(map, "preferred_citation", ctx, Citation::validate);
        let references = optional(map, "references", ctx, |v, ctx| {
            sequence_of(v, ctx, |key, ctx| constrained(key, ctx, CitationKey::parse))
        });
        let literature = defaulted(map, "literature", ctx, |v, ctx| {
            keyed(v, ctx, CitationKey::parse, Reference::validate)
        });

        Some(Self {
            species: species?,
            reactions: reactions?,
            points: points?,
            calculations: calculations?,
            schema_version: schema_version?,
            license: license?,
            preferred_citation: preferred_citation?,
            references: references?,
            literature: literature?,
        })
    }
}
