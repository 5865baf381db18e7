//! Citations, literature references and data sources

use super::Entity;
use crate::context::Context;
use crate::rules::{constrained, mapping, non_empty_string, required, sequence_of, string};
use crate::union::{Candidate, StructuralUnion};
use rmmd_ir::Value;
use rmmd_schema::{Citation, CitationKey, DataSource, Doi, HttpUrl, LocalFile, Reference};

impl Entity for Citation {
    const NAME: &'static str = "Citation";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let title = required(map, "title", ctx, non_empty_string);
        let authors = required(map, "authors", ctx, |v, ctx| sequence_of(v, ctx, string));
        let doi = required(map, "doi", ctx, |v, ctx| constrained(v, ctx, Doi::parse));
        Some(Self {
            title: title?,
            authors: authors?,
            doi: doi?,
        })
    }
}

const REFERENCE: StructuralUnion<Reference> = StructuralUnion {
    name: "Reference",
    candidates: &[
        Candidate {
            name: "Doi",
            validate: |v, ctx| constrained(v, ctx, Doi::parse).map(Reference::Doi),
        },
        Candidate {
            name: "HttpUrl",
            validate: |v, ctx| constrained(v, ctx, HttpUrl::parse).map(Reference::Url),
        },
        Candidate {
            name: Citation::NAME,
            validate: |v, ctx| Citation::validate(v, ctx).map(Reference::Citation),
        },
    ],
};

impl Entity for Reference {
    const NAME: &'static str = "Reference";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        REFERENCE.resolve(value, ctx)
    }
}

const DATA_SOURCE: StructuralUnion<DataSource> = StructuralUnion {
    name: "DataSource",
    candidates: &[
        Candidate {
            name: "CitationKey",
            validate: |v, ctx| constrained(v, ctx, CitationKey::parse).map(DataSource::Citation),
        },
        Candidate {
            name: "LocalFile",
            validate: |v, ctx| constrained(v, ctx, LocalFile::parse).map(DataSource::LocalFile),
        },
    ],
};

impl Entity for DataSource {
    const NAME: &'static str = "DataSource";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        DATA_SOURCE.resolve(value, ctx)
    }
}
