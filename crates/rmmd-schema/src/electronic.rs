//! Electronic structure view: states, quantum chemistry calculations, points
//! on potential energy surfaces and the stages of a detailed PES network.

use crate::keys::{CitationKey, PointId, QcCalculationId};
use crate::metadata::DataSource;
use crate::species::Constitution;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::num::NonZeroU32;

/// Total electron spin quantum number, a non-negative multiple of 1/2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Spin {
    twice: u32,
}

impl Spin {
    /// Spin from `2S`, e.g. `Spin::from_twice(1)` is a doublet
    #[must_use]
    pub fn from_twice(twice: u32) -> Self {
        Self { twice }
    }

    /// Spin from its numeric value; `None` unless finite, non-negative and a
    /// multiple of 1/2
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_value(value: f64) -> Option<Self> {
        let doubled = value * 2.0;
        if !doubled.is_finite() || doubled < 0.0 || doubled.fract() != 0.0 {
            return None;
        }
        if doubled > f64::from(u32::MAX) {
            return None;
        }
        Some(Self {
            twice: doubled as u32,
        })
    }

    #[must_use]
    pub fn twice(self) -> u32 {
        self.twice
    }

    #[must_use]
    pub fn value(self) -> f64 {
        f64::from(self.twice) / 2.0
    }

    /// `2S + 1`
    #[must_use]
    pub fn multiplicity(self) -> u64 {
        u64::from(self.twice) + 1
    }
}

impl Serialize for Spin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.twice % 2 == 0 {
            serializer.serialize_u64(u64::from(self.twice / 2))
        } else {
            serializer.serialize_f64(self.value())
        }
    }
}

impl JsonSchema for Spin {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("Spin")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "number",
            "minimum": 0,
            "multipleOf": 0.5
        })
    }
}

/// Definition of the electronic state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub struct ElectronicState {
    /// total charge
    pub charge: i64,
    /// total electron spin quantum number
    pub spin: Spin,
}

impl ElectronicState {
    /// Spin multiplicity, i.e. 2S+1
    #[must_use]
    pub fn spin_multiplicity(&self) -> u64 {
        self.spin.multiplicity()
    }
}

impl Serialize for ElectronicState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ElectronicState", 3)?;
        state.serialize_field("charge", &self.charge)?;
        state.serialize_field("spin", &self.spin)?;
        state.serialize_field("spin_multiplicity", &self.spin_multiplicity())?;
        state.end()
    }
}

/// Computer software used to perform a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Software {
    pub name: String,
    pub version: String,
}

/// Data from a quantum chemistry calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct QcCalculationData {
    /// level of theory used
    pub level_of_theory: String,
    pub electronic_state: ElectronicState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<Software>,
    /// literature describing the calculation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<CitationKey>>,
    /// source of the data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<DataSource>>,
}

/// Reference to a quantum chemistry calculation published elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct QcCalculationReference {
    pub level_of_theory: String,
    pub electronic_state: ElectronicState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<Software>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<CitationKey>>,
    /// where the referenced data lives
    #[schemars(length(min = 1))]
    pub source: Vec<DataSource>,
}

/// Quantum chemistry calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum QcCalculation {
    Reference(QcCalculationReference),
    Data(QcCalculationData),
}

impl QcCalculation {
    #[must_use]
    pub fn level_of_theory(&self) -> &str {
        match self {
            QcCalculation::Reference(c) => &c.level_of_theory,
            QcCalculation::Data(c) => &c.level_of_theory,
        }
    }

    #[must_use]
    pub fn electronic_state(&self) -> &ElectronicState {
        match self {
            QcCalculation::Reference(c) => &c.electronic_state,
            QcCalculation::Data(c) => &c.electronic_state,
        }
    }

    #[must_use]
    pub fn references(&self) -> &[CitationKey] {
        match self {
            QcCalculation::Reference(c) => c.references.as_deref().unwrap_or_default(),
            QcCalculation::Data(c) => c.references.as_deref().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn sources(&self) -> &[DataSource] {
        match self {
            QcCalculation::Reference(c) => &c.source,
            QcCalculation::Data(c) => c.source.as_deref().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, QcCalculation::Reference(_))
    }
}

/// Domain of a Born-Oppenheimer potential energy surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct BoPesDomain {
    pub constitution: Constitution,
    pub electronic_state: ElectronicState,
}

/// Thermochemical properties of a single point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PointThermo {}

/// Point on a potential energy surface.
///
/// Usually a stationary point, approximated by one or more quantum chemical
/// calculations. The point groups those calculations as describing the same
/// physical configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Point {
    pub domain: BoPesDomain,
    /// human-readable description of the point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// quantum chemistry calculations for this point
    #[schemars(default)]
    pub calculations: Vec<QcCalculationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermo: Option<PointThermo>,
}

/// Points that interconvert fast on the timescale of interest, e.g. conformers.
///
/// Each member carries a degeneracy. The butane conformers may be written as
/// `[(0, 1), (1, 1), (2, 1)]` or `[(0, 1), (1, 2)]`; both forms are accepted
/// as they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PointEnsemble(Vec<(PointId, NonZeroU32)>);

impl PointEnsemble {
    /// `None` for an empty member list
    #[must_use]
    pub fn new(members: Vec<(PointId, NonZeroU32)>) -> Option<Self> {
        if members.is_empty() {
            None
        } else {
            Some(Self(members))
        }
    }

    #[must_use]
    pub fn members(&self) -> &[(PointId, NonZeroU32)] {
        &self.0
    }

    #[must_use]
    pub fn total_degeneracy(&self) -> u64 {
        self.0.iter().map(|(_, d)| u64::from(d.get())).sum()
    }
}

impl JsonSchema for PointEnsemble {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("PointEnsemble")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let member = generator.subschema_for::<(PointId, NonZeroU32)>();
        json_schema!({
            "type": "array",
            "minItems": 1,
            "items": member
        })
    }
}

/// Path connecting stationary points, e.g. an IRC scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PointSequence(Vec<PointId>);

impl PointSequence {
    /// `None` for an empty path
    #[must_use]
    pub fn new(points: Vec<PointId>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self(points))
        }
    }

    #[must_use]
    pub fn points(&self) -> &[PointId] {
        &self.0
    }
}

impl JsonSchema for PointSequence {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("PointSequence")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let item = generator.subschema_for::<PointId>();
        json_schema!({
            "type": "array",
            "minItems": 1,
            "items": item
        })
    }
}

/// A single point or an ensemble of points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum PointRef {
    Single(PointId),
    Ensemble(PointEnsemble),
}

/// A well in a detailed PES network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct UnimolecularWell {
    /// stationary point(s) of the well
    pub point: PointRef,
}

/// A bi- or higher molecular well. The molecular entities are infinitely far
/// apart, so each of `points` lives on its own lower-dimensional PES domain.
#[derive(Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct NMolecularWell {
    pub points: Vec<PointRef>,
}

impl NMolecularWell {
    /// Molecularity of the well
    #[must_use]
    pub fn n(&self) -> usize {
        self.points.len()
    }
}

impl Serialize for NMolecularWell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NMolecularWell", 2)?;
        state.serialize_field("points", &self.points)?;
        state.serialize_field("n", &self.n())?;
        state.end()
    }
}

/// A van der Waals complex in a detailed PES network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct VdWComplex {
    pub point: PointRef,
}

/// Minimum region of a PES network, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Well {
    #[serde(rename = "unimolecular well")]
    Unimolecular(UnimolecularWell),
    #[serde(rename = "n-molecular well")]
    NMolecular(NMolecularWell),
    #[serde(rename = "van der Waals complex")]
    VdWComplex(VdWComplex),
}

impl Well {
    pub const UNIMOLECULAR: &'static str = "unimolecular well";
    pub const N_MOLECULAR: &'static str = "n-molecular well";
    pub const VDW_COMPLEX: &'static str = "van der Waals complex";

    /// Value of the `type` tag
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Well::Unimolecular(_) => Self::UNIMOLECULAR,
            Well::NMolecular(_) => Self::N_MOLECULAR,
            Well::VdWComplex(_) => Self::VDW_COMPLEX,
        }
    }
}

/// Saddle point of order n > 1, e.g. a second-order saddle point connecting
/// two transition state conformers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct NthOrderSaddlePoint {
    /// order of the saddle point
    #[schemars(range(min = 2))]
    pub order: u32,
    pub point: PointRef,
}

/// First-order saddle point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionState {
    pub point: PointRef,
}

impl TransitionState {
    pub const ORDER: u32 = 1;
}

impl Serialize for TransitionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TransitionState", 2)?;
        state.serialize_field("order", &Self::ORDER)?;
        state.serialize_field("point", &self.point)?;
        state.end()
    }
}

impl JsonSchema for TransitionState {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("TransitionState")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let point = generator.subschema_for::<PointRef>();
        json_schema!({
            "type": "object",
            "properties": {
                "order": { "const": 1 },
                "point": point
            },
            "required": ["point"]
        })
    }
}

/// Saddle point of a PES network, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum SaddlePoint {
    #[serde(rename = "nth-order saddle point")]
    NthOrder(NthOrderSaddlePoint),
    #[serde(rename = "transition state")]
    TransitionState(TransitionState),
}

impl SaddlePoint {
    pub const NTH_ORDER: &'static str = "nth-order saddle point";
    pub const TRANSITION_STATE: &'static str = "transition state";

    #[must_use]
    pub fn order(&self) -> u32 {
        match self {
            SaddlePoint::NthOrder(s) => s.order,
            SaddlePoint::TransitionState(_) => TransitionState::ORDER,
        }
    }

    #[must_use]
    pub fn point(&self) -> &PointRef {
        match self {
            SaddlePoint::NthOrder(s) => &s.point,
            SaddlePoint::TransitionState(s) => &s.point,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            SaddlePoint::NthOrder(_) => Self::NTH_ORDER,
            SaddlePoint::TransitionState(_) => Self::TRANSITION_STATE,
        }
    }
}

/// An edge ("reaction step") in a detailed PES network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PesReaction {
    /// product and reactant wells
    pub stages: [Well; 2],
    pub saddle_point: SaddlePoint,
    /// path connecting the stages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irc_scan_forward: Option<PointSequence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irc_scan_backward: Option<PointSequence>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nz(v: u32) -> NonZeroU32 {
        NonZeroU32::new(v).unwrap()
    }

    #[test]
    fn test_spin_from_value() {
        assert_eq!(Spin::from_value(0.0), Some(Spin::from_twice(0)));
        assert_eq!(Spin::from_value(0.5), Some(Spin::from_twice(1)));
        assert_eq!(Spin::from_value(1.0), Some(Spin::from_twice(2)));
        assert_eq!(Spin::from_value(0.25), None);
        assert_eq!(Spin::from_value(-0.5), None);
        assert_eq!(Spin::from_value(f64::NAN), None);
        assert_eq!(Spin::from_value(f64::INFINITY), None);
    }

    #[test]
    fn test_spin_multiplicity_is_derived() {
        for twice in 0..6 {
            let state = ElectronicState {
                charge: 0,
                spin: Spin::from_twice(twice),
            };
            assert_eq!(state.spin_multiplicity(), u64::from(twice) + 1);
            assert!((state.spin.value() * 2.0 - f64::from(twice)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_electronic_state_serializes_multiplicity() {
        let doublet = ElectronicState {
            charge: -1,
            spin: Spin::from_twice(1),
        };
        assert_eq!(
            serde_json::to_value(doublet).unwrap(),
            json!({"charge": -1, "spin": 0.5, "spin_multiplicity": 2})
        );

        let triplet = ElectronicState {
            charge: 0,
            spin: Spin::from_twice(2),
        };
        assert_eq!(
            serde_json::to_value(triplet).unwrap(),
            json!({"charge": 0, "spin": 1, "spin_multiplicity": 3})
        );
    }

    #[test]
    fn test_point_ensemble() {
        assert!(PointEnsemble::new(vec![]).is_none());

        let ensemble = PointEnsemble::new(vec![(PointId(0), nz(1)), (PointId(1), nz(2))]).unwrap();
        assert_eq!(ensemble.members().len(), 2);
        assert_eq!(ensemble.total_degeneracy(), 3);
        assert_eq!(serde_json::to_value(&ensemble).unwrap(), json!([[0, 1], [1, 2]]));
    }

    #[test]
    fn test_point_sequence() {
        assert!(PointSequence::new(vec![]).is_none());
        let path = PointSequence::new(vec![PointId(3), PointId(4)]).unwrap();
        assert_eq!(path.points(), &[PointId(3), PointId(4)]);
    }

    #[test]
    fn test_wells_serialize_with_tag() {
        let uni = Well::Unimolecular(UnimolecularWell {
            point: PointRef::Single(PointId(0)),
        });
        assert_eq!(
            serde_json::to_value(&uni).unwrap(),
            json!({"type": "unimolecular well", "point": 0})
        );
        assert_eq!(uni.tag(), Well::UNIMOLECULAR);

        let bimolecular = Well::NMolecular(NMolecularWell {
            points: vec![PointRef::Single(PointId(1)), PointRef::Single(PointId(2))],
        });
        assert_eq!(
            serde_json::to_value(&bimolecular).unwrap(),
            json!({"type": "n-molecular well", "points": [1, 2], "n": 2})
        );
        assert_eq!(bimolecular.tag(), Well::N_MOLECULAR);

        let vdw = Well::VdWComplex(VdWComplex {
            point: PointRef::Single(PointId(5)),
        });
        assert_eq!(serde_json::to_value(&vdw).unwrap()["type"], Well::VDW_COMPLEX);
    }

    #[test]
    fn test_transition_state_order_is_fixed() {
        let ts = SaddlePoint::TransitionState(TransitionState {
            point: PointRef::Single(PointId(3)),
        });
        assert_eq!(ts.order(), 1);
        assert_eq!(ts.tag(), SaddlePoint::TRANSITION_STATE);
        assert_eq!(
            serde_json::to_value(&ts).unwrap(),
            json!({"type": "transition state", "order": 1, "point": 3})
        );

        let second = SaddlePoint::NthOrder(NthOrderSaddlePoint {
            order: 2,
            point: PointRef::Single(PointId(4)),
        });
        assert_eq!(second.order(), 2);
        assert_eq!(second.point(), &PointRef::Single(PointId(4)));
    }

    #[test]
    fn test_calculation_accessors() {
        let state = ElectronicState {
            charge: 0,
            spin: Spin::from_twice(0),
        };
        let data = QcCalculation::Data(QcCalculationData {
            level_of_theory: "B3LYP/6-31G*".to_string(),
            electronic_state: state,
            software: None,
            references: None,
            source: None,
        });
        assert!(!data.is_reference());
        assert!(data.references().is_empty());
        assert!(data.sources().is_empty());
        assert_eq!(data.level_of_theory(), "B3LYP/6-31G*");

        let reference = QcCalculation::Reference(QcCalculationReference {
            level_of_theory: "CCSD(T)/cc-pVTZ".to_string(),
            electronic_state: state,
            software: Some(Software {
                name: "ORCA".to_string(),
                version: "5.0.4".to_string(),
            }),
            references: Some(vec![CitationKey::parse("doe2020").unwrap()]),
            source: vec![DataSource::Citation(CitationKey::parse("zenodo1").unwrap())],
        });
        assert!(reference.is_reference());
        assert_eq!(reference.sources().len(), 1);
        assert_eq!(reference.references().len(), 1);
        assert_eq!(reference.electronic_state(), &state);

        let value = serde_json::to_value(&reference).unwrap();
        assert_eq!(value["source"], json!(["zenodo1"]));
        assert_eq!(value["software"]["name"], "ORCA");
    }
}
