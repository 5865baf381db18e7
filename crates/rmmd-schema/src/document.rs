//! Document root

use crate::electronic::{Point, QcCalculation};
use crate::keys::{CitationKey, PointId, QcCalculationId, SpeciesName};
use crate::metadata::{Citation, Reference};
use crate::species::{Reaction, Species};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Schema version every document must declare
pub const SCHEMA_VERSION: &str = "1.0.0b0";

/// The `schema_version` literal; only [`SCHEMA_VERSION`] is representable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SchemaVersion;

impl SchemaVersion {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        SCHEMA_VERSION
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(SCHEMA_VERSION)
    }
}

impl JsonSchema for SchemaVersion {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("SchemaVersion")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "const": SCHEMA_VERSION
        })
    }
}

/// A validated RMMD dataset.
///
/// Owns every entity collection. [`PointId`] and [`QcCalculationId`] values
/// anywhere in the tree are positions into `points` and `calculations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[schemars(title = "RMMD")]
pub struct Document {
    /// species in the dataset
    #[schemars(default)]
    pub species: BTreeMap<SpeciesName, Species>,
    /// reactions in the dataset
    #[schemars(default)]
    pub reactions: Vec<Reaction>,
    /// points on potential energy surfaces
    #[schemars(default)]
    pub points: Vec<Point>,
    /// quantum chemistry calculations
    #[schemars(default)]
    pub calculations: Vec<QcCalculation>,
    pub schema_version: SchemaVersion,
    /// license of the dataset, e.g. `CC-BY-4.0`
    #[schemars(length(min = 1))]
    pub license: String,
    /// how the dataset should be cited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_citation: Option<Citation>,
    /// literature the dataset is based on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<CitationKey>>,
    /// all literature cited anywhere in the dataset
    #[schemars(default)]
    pub literature: BTreeMap<CitationKey, Reference>,
}

impl Document {
    #[must_use]
    pub fn point(&self, id: PointId) -> Option<&Point> {
        id.index().and_then(|i| self.points.get(i))
    }

    #[must_use]
    pub fn calculation(&self, id: QcCalculationId) -> Option<&QcCalculation> {
        id.index().and_then(|i| self.calculations.get(i))
    }

    /// Calculations of a point, skipping ids that do not resolve
    pub fn calculations_of<'a>(
        &'a self,
        point: &'a Point,
    ) -> impl Iterator<Item = &'a QcCalculation> + 'a {
        point
            .calculations
            .iter()
            .filter_map(move |&id| self.calculation(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::electronic::{BoPesDomain, ElectronicState, QcCalculationData, Spin};
    use crate::species::Constitution;
    use serde_json::json;

    fn empty() -> Document {
        Document {
            species: BTreeMap::new(),
            reactions: vec![],
            points: vec![],
            calculations: vec![],
            schema_version: SchemaVersion,
            license: "CC-BY-4.0".to_string(),
            preferred_citation: None,
            references: None,
            literature: BTreeMap::new(),
        }
    }

    #[test]
    fn test_schema_version_serializes_literal() {
        assert_eq!(serde_json::to_value(SchemaVersion).unwrap(), json!("1.0.0b0"));
        assert_eq!(SchemaVersion.as_str(), SCHEMA_VERSION);
    }

    #[test]
    fn test_empty_document_serialization() {
        assert_eq!(
            serde_json::to_value(empty()).unwrap(),
            json!({
                "species": {},
                "reactions": [],
                "points": [],
                "calculations": [],
                "schema_version": "1.0.0b0",
                "license": "CC-BY-4.0",
                "literature": {}
            })
        );
    }

    #[test]
    fn test_id_lookup() {
        let state = ElectronicState {
            charge: 0,
            spin: Spin::from_twice(0),
        };
        let mut doc = empty();
        doc.calculations.push(QcCalculation::Data(QcCalculationData {
            level_of_theory: "HF/STO-3G".to_string(),
            electronic_state: state,
            software: None,
            references: None,
            source: None,
        }));
        doc.points.push(Point {
            domain: BoPesDomain {
                constitution: Constitution::default(),
                electronic_state: state,
            },
            description: None,
            calculations: vec![QcCalculationId(0), QcCalculationId(4)],
            thermo: None,
        });

        assert!(doc.point(PointId(0)).is_some());
        assert!(doc.point(PointId(1)).is_none());
        assert!(doc.point(PointId(-1)).is_none());
        assert!(doc.calculation(QcCalculationId(0)).is_some());

        let point = &doc.points[0];
        assert_eq!(doc.calculations_of(point).count(), 1);
    }
}
