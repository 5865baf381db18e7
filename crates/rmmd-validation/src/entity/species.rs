//! Species and mechanism entities

use super::Entity;
use crate::context::Context;
use crate::error::ErrorKind;
use crate::rules::{
    constrained, defaulted, integer, keyed, mapping, non_empty_sequence_of, optional, required,
    sequence_of, string, type_mismatch, unsigned,
};
use crate::union::{Candidate, StructuralUnion, TaggedUnion, Variant};
use rmmd_ir::Value;
use rmmd_schema::{
    CitationKey, CoarseNode, Constitution, ElectronicState, EntityPoints, IdentifierValue,
    Isotopes, MolecularConnectivity, MolecularEntity, PesReaction, Point, Reaction,
    ReactionDefinition, Role, Species, SpeciesIdentifier, Stereochemistry, StringIdentifier,
    ThermoProperty, TransportProperty,
};

impl Entity for Constitution {
    const NAME: &'static str = "Constitution";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let element_count = required(map, "element_count", ctx, |v, ctx| {
            keyed(v, ctx, |symbol| Ok(symbol.to_string()), |n, ctx| unsigned(n, ctx, 0))
        })?;
        Some(Self { element_count })
    }
}

impl Entity for Isotopes {
    const NAME: &'static str = "Isotopes";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let n_neutrons = required(map, "n_neutrons", ctx, |v, ctx| sequence_of(v, ctx, integer))?;
        Some(Self { n_neutrons })
    }
}

fn connectivity(value: &Value, ctx: &mut Context) -> Option<MolecularConnectivity> {
    mapping(value, ctx).map(|_| MolecularConnectivity {})
}

fn stereochemistry(value: &Value, ctx: &mut Context) -> Option<Stereochemistry> {
    mapping(value, ctx).map(|_| Stereochemistry {})
}

fn identifier_value(value: &Value, ctx: &mut Context) -> Option<IdentifierValue> {
    let map = mapping(value, ctx)?;
    let id = required(map, "value", ctx, string);
    let canonical_repr = required(map, "canonical_repr", ctx, string);
    Some(IdentifierValue {
        value: id?,
        canonical_repr: canonical_repr?,
    })
}

const STRING_IDENTIFIER: TaggedUnion<StringIdentifier> = TaggedUnion {
    name: "StringIdentifier",
    field: "type",
    variants: &[
        Variant {
            tag: StringIdentifier::STANDARD_INCHI,
            validate: |v, ctx| identifier_value(v, ctx).map(StringIdentifier::StandardInChI),
        },
        Variant {
            tag: StringIdentifier::SMILES,
            validate: |v, ctx| identifier_value(v, ctx).map(StringIdentifier::Smiles),
        },
    ],
};

impl Entity for StringIdentifier {
    const NAME: &'static str = "StringIdentifier";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        STRING_IDENTIFIER.resolve(value, ctx)
    }
}

const SPECIES_IDENTIFIER: StructuralUnion<SpeciesIdentifier> = StructuralUnion {
    name: "SpeciesIdentifier",
    candidates: &[
        Candidate {
            name: Constitution::NAME,
            validate: |v, ctx| Constitution::validate(v, ctx).map(SpeciesIdentifier::Constitution),
        },
        Candidate {
            name: StringIdentifier::NAME,
            validate: |v, ctx| StringIdentifier::validate(v, ctx).map(SpeciesIdentifier::String),
        },
    ],
};

impl Entity for SpeciesIdentifier {
    const NAME: &'static str = "SpeciesIdentifier";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        SPECIES_IDENTIFIER.resolve(value, ctx)
    }
}

fn entity_points(value: &Value, ctx: &mut Context) -> Option<EntityPoints> {
    match value {
        Value::String(s) if s == EntityPoints::ALL => Some(EntityPoints::All),
        Value::String(s) => {
            ctx.report(
                ErrorKind::InvalidFormat,
                format!("expected '{}' or a list of points, got '{s}'", EntityPoints::ALL),
            );
            None
        }
        Value::Sequence(_) => sequence_of(value, ctx, Point::validate).map(EntityPoints::Listed),
        other => {
            type_mismatch(ctx, "sequence", other);
            None
        }
    }
}

impl Entity for MolecularEntity {
    const NAME: &'static str = "MolecularEntity";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let constitution = required(map, "constitution", ctx, Constitution::validate);
        let connectivity = required(map, "connectivity", ctx, connectivity);
        let isotope = optional(map, "isotope", ctx, Isotopes::validate);
        let stereo = optional(map, "stereo", ctx, stereochemistry);
        let electronic_state = optional(map, "electronic_state", ctx, ElectronicState::validate);
        let points = defaulted(map, "points", ctx, entity_points);
        Some(Self {
            constitution: constitution?,
            connectivity: connectivity?,
            isotope: isotope?,
            stereo: stereo?,
            electronic_state: electronic_state?,
            points: points?,
        })
    }
}

fn thermo_property(value: &Value, ctx: &mut Context) -> Option<ThermoProperty> {
    mapping(value, ctx).map(|_| ThermoProperty {})
}

fn transport_property(value: &Value, ctx: &mut Context) -> Option<TransportProperty> {
    mapping(value, ctx).map(|_| TransportProperty {})
}

impl Entity for Species {
    const NAME: &'static str = "Species";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let entities = required(map, "entities", ctx, |v, ctx| {
            non_empty_sequence_of(v, ctx, MolecularEntity::validate)
        });
        let thermo = defaulted(map, "thermo", ctx, |v, ctx| {
            sequence_of(v, ctx, thermo_property)
        });
        let transport = defaulted(map, "transport", ctx, |v, ctx| {
            sequence_of(v, ctx, transport_property)
        });
        Some(Self {
            entities: entities?,
            thermo: thermo?,
            transport: transport?,
        })
    }
}

fn role(value: &Value, ctx: &mut Context) -> Option<Role> {
    let name = string(value, ctx)?;
    let role = Role::parse(&name);
    if role.is_none() {
        let expected: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
        ctx.report(
            ErrorKind::InvalidFormat,
            format!("role must be one of {}, got '{name}'", expected.join(", ")),
        );
    }
    role
}

impl Entity for CoarseNode {
    const NAME: &'static str = "CoarseNode";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let role = required(map, "role", ctx, role);
        let species = required(map, "species", ctx, Species::validate);
        Some(Self {
            role: role?,
            species: species?,
        })
    }
}

impl Entity for ReactionDefinition {
    const NAME: &'static str = "ReactionDefinition";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let references = optional(map, "references", ctx, |v, ctx| {
            sequence_of(v, ctx, |key, ctx| constrained(key, ctx, CitationKey::parse))
        });
        let pes_reaction = required(map, "pes_reaction", ctx, PesReaction::validate);
        Some(Self {
            references: references?,
            pes_reaction: pes_reaction?,
        })
    }
}

impl Entity for Reaction {
    const NAME: &'static str = "Reaction";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let nodes = required(map, "nodes", ctx, |v, ctx| {
            sequence_of(v, ctx, CoarseNode::validate)
        });
        let definition = required(map, "definition", ctx, ReactionDefinition::validate);
        Some(Self {
            nodes: nodes?,
            definition: definition?,
        })
    }
}
