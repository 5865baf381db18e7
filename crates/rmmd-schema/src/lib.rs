#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rmmd-schema
//!
//! Typed entity model for RMMD reaction mechanism datasets.
//!
//! Values in this crate are immutable once built; the validation engine is
//! the only producer of a [`Document`]. The model covers two views:
//! electronic structure (calculations, points, PES reactions) and the
//! mechanism (species, reactions). Integer ids link the two through the
//! document's flat `points` and `calculations` lists.

pub mod document;
pub mod electronic;
pub mod introspect;
pub mod keys;
pub mod metadata;
pub mod species;

pub use document::{Document, SCHEMA_VERSION, SchemaVersion};
pub use electronic::{
    BoPesDomain, ElectronicState, NMolecularWell, NthOrderSaddlePoint, PesReaction, Point,
    PointEnsemble, PointRef, PointSequence, PointThermo, QcCalculation, QcCalculationData,
    QcCalculationReference, SaddlePoint, Software, Spin, TransitionState, UnimolecularWell,
    VdWComplex, Well,
};
pub use introspect::document_schema;
pub use keys::{
    CitationKey, Doi, EntityKey, HttpUrl, KeyConstraint, LocalFile, PointId, QcCalculationId,
    SpeciesName,
};
pub use metadata::{Citation, DataSource, Reference};
pub use species::{
    Canonicalizer, CoarseNode, Constitution, EntityPoints, IdentifierValue, Isotopes,
    MolecularConnectivity, MolecularEntity, NoCanonicalization, Reaction, ReactionDefinition,
    Role, Species, SpeciesIdentifier, Stereochemistry, StringIdentifier, ThermoProperty,
    TransportProperty,
};

use thiserror::Error;

/// A string scalar violating its entry in the constraint table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("{name} must have at least {min} characters, got {actual}")]
    TooShort {
        name: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("{name} must have at most {max} characters, got {actual}")]
    TooLong {
        name: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{name} '{value}' does not match pattern {pattern}")]
    Pattern {
        name: &'static str,
        value: String,
        pattern: &'static str,
    },
}

impl KeyError {
    /// Name of the violated constraint
    #[must_use]
    pub fn constraint(&self) -> &'static str {
        match self {
            KeyError::TooShort { name, .. }
            | KeyError::TooLong { name, .. }
            | KeyError::Pattern { name, .. } => name,
        }
    }
}
