//! Validators turning raw values into typed entities

mod document;
mod electronic;
mod metadata;
mod species;

use crate::context::Context;
use rmmd_ir::Value;
use std::fmt;
use std::str::FromStr;

/// A schema entity that can be validated from a raw value.
///
/// `validate` reports every problem it finds into the context and returns
/// `None` when it cannot build the entity. A returned value is only
/// trustworthy if the context gained no errors.
pub trait Entity: Sized {
    /// Name used in error messages and by [`SchemaPart`]
    const NAME: &'static str;

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self>;
}

macro_rules! schema_parts {
    ($($part:ident => $ty:ty),+ $(,)?) => {
        /// Entity a raw value is validated as. `Document` runs the full
        /// pipeline; the others validate a fragment in isolation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SchemaPart {
            $($part),+
        }

        impl SchemaPart {
            pub const ALL: &'static [SchemaPart] = &[$(SchemaPart::$part),+];

            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(SchemaPart::$part => <$ty as Entity>::NAME),+
                }
            }

            /// Structural validation of `value` as this part
            pub(crate) fn check(self, value: &Value, ctx: &mut Context) {
                match self {
                    $(SchemaPart::$part => {
                        <$ty as Entity>::validate(value, ctx);
                    })+
                }
            }
        }
    };
}

schema_parts! {
    Document => rmmd_schema::Document,
    Species => rmmd_schema::Species,
    MolecularEntity => rmmd_schema::MolecularEntity,
    Constitution => rmmd_schema::Constitution,
    Isotopes => rmmd_schema::Isotopes,
    SpeciesIdentifier => rmmd_schema::SpeciesIdentifier,
    StringIdentifier => rmmd_schema::StringIdentifier,
    Reaction => rmmd_schema::Reaction,
    CoarseNode => rmmd_schema::CoarseNode,
    ReactionDefinition => rmmd_schema::ReactionDefinition,
    PesReaction => rmmd_schema::PesReaction,
    Well => rmmd_schema::Well,
    SaddlePoint => rmmd_schema::SaddlePoint,
    UnimolecularWell => rmmd_schema::UnimolecularWell,
    NMolecularWell => rmmd_schema::NMolecularWell,
    VdWComplex => rmmd_schema::VdWComplex,
    NthOrderSaddlePoint => rmmd_schema::NthOrderSaddlePoint,
    TransitionState => rmmd_schema::TransitionState,
    PointRef => rmmd_schema::PointRef,
    PointEnsemble => rmmd_schema::PointEnsemble,
    PointSequence => rmmd_schema::PointSequence,
    Point => rmmd_schema::Point,
    BoPesDomain => rmmd_schema::BoPesDomain,
    QcCalculation => rmmd_schema::QcCalculation,
    QcCalculationData => rmmd_schema::QcCalculationData,
    QcCalculationReference => rmmd_schema::QcCalculationReference,
    ElectronicState => rmmd_schema::ElectronicState,
    Software => rmmd_schema::Software,
    Citation => rmmd_schema::Citation,
    Reference => rmmd_schema::Reference,
}

impl fmt::Display for SchemaPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaPart {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|part| part.name() == s)
            .ok_or_else(|| crate::Error::UnknownSchemaPart(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_names_round_trip() {
        for part in SchemaPart::ALL {
            assert_eq!(part.name().parse::<SchemaPart>().unwrap(), *part);
        }
        assert_eq!(SchemaPart::PesReaction.to_string(), "PesReaction");
    }

    #[test]
    fn test_unknown_part() {
        let err = "Mechanism".parse::<SchemaPart>().unwrap_err();
        assert!(err.to_string().contains("Mechanism"));
    }
}
