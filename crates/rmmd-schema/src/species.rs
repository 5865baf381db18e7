//! Mechanism view: species, molecular entities, identifiers and reactions

use crate::electronic::{ElectronicState, PesReaction, Point};
use crate::keys::{CitationKey, EntityKey};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Molecular constitution, e.g. `{"C": 1, "H": 4}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Constitution {
    pub element_count: BTreeMap<String, u32>,
}

impl Constitution {
    #[must_use]
    pub fn atom_count(&self) -> u64 {
        self.element_count.values().map(|&n| u64::from(n)).sum()
    }
}

/// Isotope information for each atom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Isotopes {
    /// number of neutrons for each atom
    pub n_neutrons: Vec<i64>,
}

/// Connectivity between atoms. No canonical graph form is defined yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MolecularConnectivity {}

/// Stereochemistry. Stereocenters are not modelled yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Stereochemistry {}

/// Payload shared by the string identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct IdentifierValue {
    pub value: String,
    pub canonical_repr: String,
}

/// String identifier of a species, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum StringIdentifier {
    /// Standard IUPAC International Chemical Identifier; being canonical, its
    /// value is its canonical representation
    #[serde(rename = "SInChI")]
    StandardInChI(IdentifierValue),
    #[serde(rename = "SMILES")]
    Smiles(IdentifierValue),
}

impl StringIdentifier {
    pub const STANDARD_INCHI: &'static str = "SInChI";
    pub const SMILES: &'static str = "SMILES";

    #[must_use]
    pub fn value(&self) -> &IdentifierValue {
        match self {
            StringIdentifier::StandardInChI(v) | StringIdentifier::Smiles(v) => v,
        }
    }
}

/// Anything that identifies a species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum SpeciesIdentifier {
    Constitution(Constitution),
    String(StringIdentifier),
}

/// Points of a molecular entity: an explicit list, or every point in the
/// dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EntityPoints {
    #[default]
    All,
    Listed(Vec<Point>),
}

impl EntityPoints {
    pub const ALL: &'static str = "all";
}

impl Serialize for EntityPoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntityPoints::All => serializer.serialize_str(Self::ALL),
            EntityPoints::Listed(points) => points.serialize(serializer),
        }
    }
}

impl JsonSchema for EntityPoints {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("EntityPoints")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let points = generator.subschema_for::<Vec<Point>>();
        json_schema!({
            "anyOf": [
                points,
                { "const": "all" }
            ],
            "default": "all"
        })
    }
}

/// Identifiable and distinguishable entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MolecularEntity {
    pub constitution: Constitution,
    pub connectivity: MolecularConnectivity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isotope: Option<Isotopes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stereo: Option<Stereochemistry>,
    /// usually the ground state is assumed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electronic_state: Option<ElectronicState>,
    #[schemars(default)]
    pub points: EntityPoints,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ThermoProperty {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TransportProperty {}

/// A chemical species: an ensemble of one or more molecular entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Species {
    #[schemars(length(min = 1))]
    pub entities: Vec<MolecularEntity>,
    #[schemars(default)]
    pub thermo: Vec<ThermoProperty>,
    #[schemars(default)]
    pub transport: Vec<TransportProperty>,
}

/// Canonical representation of molecular entities.
///
/// Canonical forms of constitution, connectivity and stereochemistry are not
/// defined by the schema; implementations plug in here.
pub trait Canonicalizer {
    /// Key of the entity's canonical form, if one can be derived
    fn entity_key(&self, entity: &MolecularEntity) -> Option<EntityKey>;
}

/// Canonicalizer that never derives a key
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCanonicalization;

impl Canonicalizer for NoCanonicalization {
    fn entity_key(&self, _entity: &MolecularEntity) -> Option<EntityKey> {
        None
    }
}

impl Species {
    /// Canonical keys of all entities; `None` unless every entity has one.
    /// A species whose entities are all canonical is itself canonical.
    pub fn canonical_keys(&self, canonicalizer: &dyn Canonicalizer) -> Option<Vec<EntityKey>> {
        self.entities
            .iter()
            .map(|entity| canonicalizer.entity_key(entity))
            .collect()
    }
}

/// Role of a species in a coarse reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reactant,
    Product,
    Solvent,
    Catalyst,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Reactant, Role::Product, Role::Solvent, Role::Catalyst];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Reactant => "reactant",
            Role::Product => "product",
            Role::Solvent => "solvent",
            Role::Catalyst => "catalyst",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node in a reaction network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CoarseNode {
    pub role: Role,
    pub species: Species,
}

/// Connects a coarse reaction to its detailed PES representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReactionDefinition {
    /// literature where the detailed data was combined into a
    /// phenomenological reaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<CitationKey>>,
    pub pes_reaction: PesReaction,
}

/// A chemical reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Reaction {
    pub nodes: Vec<CoarseNode>,
    pub definition: ReactionDefinition,
}
