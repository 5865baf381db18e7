//! Electronic structure entities

use super::Entity;
use crate::context::Context;
use crate::error::ErrorKind;
use crate::rules::{
    constrained, defaulted, integer, mapping, non_empty_sequence_of, optional, required,
    sequence_of, string, type_mismatch, unsigned,
};
use crate::union::{Candidate, StructuralUnion, TaggedUnion, Variant};
use rmmd_ir::{Mapping, Value};
use rmmd_schema::{
    BoPesDomain, CitationKey, Constitution, DataSource, ElectronicState, NMolecularWell,
    NthOrderSaddlePoint, PesReaction, Point, PointEnsemble, PointId, PointRef, PointSequence,
    PointThermo, QcCalculation, QcCalculationData, QcCalculationId, QcCalculationReference,
    SaddlePoint, Software, Spin, TransitionState, UnimolecularWell, VdWComplex, Well,
};
use std::num::NonZeroU32;

fn spin(value: &Value, ctx: &mut Context) -> Option<Spin> {
    let Some(number) = value.as_number() else {
        type_mismatch(ctx, "number", value);
        return None;
    };
    let spin = Spin::from_value(number);
    if spin.is_none() {
        ctx.report(
            ErrorKind::InvalidFormat,
            format!("spin must be a non-negative multiple of 1/2, got {number}"),
        );
    }
    spin
}

impl Entity for ElectronicState {
    const NAME: &'static str = "ElectronicState";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let charge = required(map, "charge", ctx, integer);
        let spin = required(map, "spin", ctx, spin);
        // spin_multiplicity is derived from spin; a supplied value is ignored
        Some(Self {
            charge: charge?,
            spin: spin?,
        })
    }
}

impl Entity for Software {
    const NAME: &'static str = "Software";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let name = required(map, "name", ctx, string);
        let version = required(map, "version", ctx, string);
        Some(Self {
            name: name?,
            version: version?,
        })
    }
}

fn citation_key(value: &Value, ctx: &mut Context) -> Option<CitationKey> {
    constrained(value, ctx, CitationKey::parse)
}

fn citation_keys(value: &Value, ctx: &mut Context) -> Option<Vec<CitationKey>> {
    sequence_of(value, ctx, citation_key)
}

fn data_sources(value: &Value, ctx: &mut Context) -> Option<Vec<DataSource>> {
    sequence_of(value, ctx, DataSource::validate)
}

/// Fields shared by both calculation variants
struct CalculationCommon {
    level_of_theory: String,
    electronic_state: ElectronicState,
    software: Option<Software>,
    references: Option<Vec<CitationKey>>,
}

impl CalculationCommon {
    fn validate(map: &Mapping, ctx: &mut Context) -> Option<Self> {
        let level_of_theory = required(map, "level_of_theory", ctx, string);
        let electronic_state = required(map, "electronic_state", ctx, ElectronicState::validate);
        let software = optional(map, "software", ctx, Software::validate);
        let references = optional(map, "references", ctx, citation_keys);
        Some(Self {
            level_of_theory: level_of_theory?,
            electronic_state: electronic_state?,
            software: software?,
            references: references?,
        })
    }
}

impl Entity for QcCalculationData {
    const NAME: &'static str = "QcCalculationData";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let common = CalculationCommon::validate(map, ctx);
        let source = optional(map, "source", ctx, data_sources);
        let common = common?;
        Some(Self {
            level_of_theory: common.level_of_theory,
            electronic_state: common.electronic_state,
            software: common.software,
            references: common.references,
            source: source?,
        })
    }
}

impl Entity for QcCalculationReference {
    const NAME: &'static str = "QcCalculationReference";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let common = CalculationCommon::validate(map, ctx);
        let source = required(map, "source", ctx, |v, ctx| {
            non_empty_sequence_of(v, ctx, DataSource::validate)
        });
        let common = common?;
        Some(Self {
            level_of_theory: common.level_of_theory,
            electronic_state: common.electronic_state,
            software: common.software,
            references: common.references,
            source: source?,
        })
    }
}

// A reference must name where its data lives, so it is tried first; any
// calculation without a usable `source` falls through to plain data.
const QC_CALCULATION: StructuralUnion<QcCalculation> = StructuralUnion {
    name: "QcCalculation",
    candidates: &[
        Candidate {
            name: QcCalculationReference::NAME,
            validate: |v, ctx| QcCalculationReference::validate(v, ctx).map(QcCalculation::Reference),
        },
        Candidate {
            name: QcCalculationData::NAME,
            validate: |v, ctx| QcCalculationData::validate(v, ctx).map(QcCalculation::Data),
        },
    ],
};

impl Entity for QcCalculation {
    const NAME: &'static str = "QcCalculation";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        QC_CALCULATION.resolve(value, ctx)
    }
}

impl Entity for BoPesDomain {
    const NAME: &'static str = "BoPesDomain";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let constitution = required(map, "constitution", ctx, Constitution::validate);
        let electronic_state = required(map, "electronic_state", ctx, ElectronicState::validate);
        Some(Self {
            constitution: constitution?,
            electronic_state: electronic_state?,
        })
    }
}

fn point_thermo(value: &Value, ctx: &mut Context) -> Option<PointThermo> {
    mapping(value, ctx).map(|_| PointThermo {})
}

fn calculation_id(value: &Value, ctx: &mut Context) -> Option<QcCalculationId> {
    integer(value, ctx).map(QcCalculationId)
}

impl Entity for Point {
    const NAME: &'static str = "Point";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let domain = required(map, "domain", ctx, BoPesDomain::validate);
        let description = optional(map, "description", ctx, string);
        let calculations = defaulted(map, "calculations", ctx, |v, ctx| {
            sequence_of(v, ctx, calculation_id)
        });
        let thermo = optional(map, "thermo", ctx, point_thermo);
        Some(Self {
            domain: domain?,
            description: description?,
            calculations: calculations?,
            thermo: thermo?,
        })
    }
}

fn point_id(value: &Value, ctx: &mut Context) -> Option<PointId> {
    integer(value, ctx).map(PointId)
}

fn ensemble_member(value: &Value, ctx: &mut Context) -> Option<(PointId, NonZeroU32)> {
    let Some(pair) = value.as_sequence() else {
        type_mismatch(ctx, "sequence", value);
        return None;
    };
    let [point, degeneracy] = pair else {
        ctx.report(
            ErrorKind::InvalidFormat,
            format!(
                "ensemble member must be a [point, degeneracy] pair, got {} items",
                pair.len()
            ),
        );
        return None;
    };
    let point = ctx.in_index(0, |ctx| point_id(point, ctx));
    let degeneracy = ctx.in_index(1, |ctx| unsigned(degeneracy, ctx, 1));
    Some((point?, NonZeroU32::new(degeneracy?)?))
}

impl Entity for PointEnsemble {
    const NAME: &'static str = "PointEnsemble";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        non_empty_sequence_of(value, ctx, ensemble_member).and_then(PointEnsemble::new)
    }
}

impl Entity for PointSequence {
    const NAME: &'static str = "PointSequence";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        non_empty_sequence_of(value, ctx, point_id).and_then(PointSequence::new)
    }
}

const POINT_REF: StructuralUnion<PointRef> = StructuralUnion {
    name: "PointRef",
    candidates: &[
        Candidate {
            name: "PointId",
            validate: |v, ctx| point_id(v, ctx).map(PointRef::Single),
        },
        Candidate {
            name: PointEnsemble::NAME,
            validate: |v, ctx| PointEnsemble::validate(v, ctx).map(PointRef::Ensemble),
        },
    ],
};

impl Entity for PointRef {
    const NAME: &'static str = "PointRef";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        POINT_REF.resolve(value, ctx)
    }
}

impl Entity for UnimolecularWell {
    const NAME: &'static str = "UnimolecularWell";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let point = required(map, "point", ctx, PointRef::validate)?;
        Some(Self { point })
    }
}

impl Entity for NMolecularWell {
    const NAME: &'static str = "NMolecularWell";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        // n is derived from points; a supplied value is ignored
        let points = required(map, "points", ctx, |v, ctx| {
            sequence_of(v, ctx, PointRef::validate)
        })?;
        Some(Self { points })
    }
}

impl Entity for VdWComplex {
    const NAME: &'static str = "VdWComplex";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let point = required(map, "point", ctx, PointRef::validate)?;
        Some(Self { point })
    }
}

const WELL: TaggedUnion<Well> = TaggedUnion {
    name: "Well",
    field: "type",
    variants: &[
        Variant {
            tag: Well::UNIMOLECULAR,
            validate: |v, ctx| UnimolecularWell::validate(v, ctx).map(Well::Unimolecular),
        },
        Variant {
            tag: Well::N_MOLECULAR,
            validate: |v, ctx| NMolecularWell::validate(v, ctx).map(Well::NMolecular),
        },
        Variant {
            tag: Well::VDW_COMPLEX,
            validate: |v, ctx| VdWComplex::validate(v, ctx).map(Well::VdWComplex),
        },
    ],
};

impl Entity for Well {
    const NAME: &'static str = "Well";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        WELL.resolve(value, ctx)
    }
}

impl Entity for NthOrderSaddlePoint {
    const NAME: &'static str = "NthOrderSaddlePoint";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let order = required(map, "order", ctx, |v, ctx| unsigned(v, ctx, 2));
        let point = required(map, "point", ctx, PointRef::validate);
        Some(Self {
            order: order?,
            point: point?,
        })
    }
}

fn transition_state_order(value: &Value, ctx: &mut Context) -> Option<u32> {
    let order = integer(value, ctx)?;
    if order == i64::from(TransitionState::ORDER) {
        Some(TransitionState::ORDER)
    } else {
        ctx.report(
            ErrorKind::InvalidFormat,
            format!(
                "transition state order must be {}, got {order}",
                TransitionState::ORDER
            ),
        );
        None
    }
}

impl Entity for TransitionState {
    const NAME: &'static str = "TransitionState";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        // fixed order first, then the fields shared with nth-order saddle points
        let order = optional(map, "order", ctx, transition_state_order);
        let point = required(map, "point", ctx, PointRef::validate);
        order?;
        Some(Self { point: point? })
    }
}

const SADDLE_POINT: TaggedUnion<SaddlePoint> = TaggedUnion {
    name: "SaddlePoint",
    field: "type",
    variants: &[
        Variant {
            tag: SaddlePoint::NTH_ORDER,
            validate: |v, ctx| NthOrderSaddlePoint::validate(v, ctx).map(SaddlePoint::NthOrder),
        },
        Variant {
            tag: SaddlePoint::TRANSITION_STATE,
            validate: |v, ctx| TransitionState::validate(v, ctx).map(SaddlePoint::TransitionState),
        },
    ],
};

impl Entity for SaddlePoint {
    const NAME: &'static str = "SaddlePoint";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        SADDLE_POINT.resolve(value, ctx)
    }
}

fn stages(value: &Value, ctx: &mut Context) -> Option<[Well; 2]> {
    let wells = sequence_of(value, ctx, Well::validate);
    let len = value.as_sequence().map_or(0, <[Value]>::len);
    if value.as_sequence().is_some() && len != 2 {
        ctx.report(
            ErrorKind::InvalidFormat,
            format!("stages must hold exactly 2 wells, got {len}"),
        );
        return None;
    }
    <[Well; 2]>::try_from(wells?).ok()
}

impl Entity for PesReaction {
    const NAME: &'static str = "PesReaction";

    fn validate(value: &Value, ctx: &mut Context) -> Option<Self> {
        let map = mapping(value, ctx)?;
        let stages = required(map, "stages", ctx, stages);
        let saddle_point = required(map, "saddle_point", ctx, SaddlePoint::validate);
        let irc_scan_forward = optional(map, "irc_scan_forward", ctx, PointSequence::validate);
        let irc_scan_backward = optional(map, "irc_scan_backward", ctx, PointSequence::validate);
        Some(Self {
            stages: stages?,
            saddle_point: saddle_point?,
            irc_scan_forward: irc_scan_forward?,
            irc_scan_backward: irc_scan_backward?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmmd_adapter::from_yaml_str;

    fn check<T: Entity>(yaml: &str) -> (Option<T>, Vec<String>) {
        let value = from_yaml_str(yaml).unwrap();
        let mut ctx = Context::new();
        let result = T::validate(&value, &mut ctx);
        let errors = ctx.into_errors().iter().map(ToString::to_string).collect();
        (result, errors)
    }

    #[test]
    fn test_electronic_state_ignores_supplied_multiplicity() {
        let (state, errors) =
            check::<ElectronicState>("charge: 0\nspin: 0.5\nspin_multiplicity: 7\n");
        assert!(errors.is_empty());
        assert_eq!(state.unwrap().spin_multiplicity(), 2);
    }

    #[test]
    fn test_electronic_state_collects_both_fields() {
        let (state, errors) = check::<ElectronicState>("charge: one\nspin: 0.3\n");
        assert!(state.is_none());
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("charge: expected integer"));
        assert!(errors[1].starts_with("spin: spin must be a non-negative multiple of 1/2"));
    }

    #[test]
    fn test_calculation_with_source_is_a_reference() {
        let (calc, errors) = check::<QcCalculation>(
            "level_of_theory: CCSD(T)/cc-pVTZ\n\
             electronic_state: {charge: 0, spin: 0}\n\
             source: [doe2020, ./raw/out.log]\n",
        );
        assert!(errors.is_empty(), "{errors:?}");
        let calc = calc.unwrap();
        assert!(calc.is_reference());
        assert_eq!(calc.sources()[1], DataSource::LocalFile("./raw/out.log".parse().unwrap()));
    }

    #[test]
    fn test_calculation_without_source_is_data() {
        let (calc, errors) = check::<QcCalculation>(
            "level_of_theory: B3LYP/6-31G*\nelectronic_state: {charge: 1, spin: 0.5}\n",
        );
        assert!(errors.is_empty());
        assert!(!calc.unwrap().is_reference());
    }

    #[test]
    fn test_calculation_matching_nothing_lists_both_variants() {
        let (calc, errors) = check::<QcCalculation>("electronic_state: {charge: 0, spin: 0}\n");
        assert!(calc.is_none());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no variant of QcCalculation"));
        assert!(errors[0].contains("QcCalculationReference [level_of_theory"));
        assert!(errors[0].contains("QcCalculationData [level_of_theory"));
    }

    #[test]
    fn test_point_defaults_calculations() {
        let (point, errors) = check::<Point>(
            "domain:\n  constitution: {element_count: {H: 2}}\n  electronic_state: {charge: 0, spin: 0}\n",
        );
        assert!(errors.is_empty());
        assert!(point.unwrap().calculations.is_empty());
    }

    #[test]
    fn test_point_ref_forms() {
        let (single, _) = check::<PointRef>("3");
        assert_eq!(single, Some(PointRef::Single(PointId(3))));

        let (ensemble, errors) = check::<PointRef>("[[0, 1], [1, 2]]");
        assert!(errors.is_empty());
        let Some(PointRef::Ensemble(ensemble)) = ensemble else {
            panic!("expected ensemble");
        };
        assert_eq!(ensemble.total_degeneracy(), 3);

        let (bad, errors) = check::<PointRef>("[[0, 0]]");
        assert!(bad.is_none());
        assert!(errors[0].contains("PointEnsemble [[0][1]: must be an integer >= 1, got 0]"));
    }

    #[test]
    fn test_empty_sequences_rejected() {
        let (ensemble, errors) = check::<PointEnsemble>("[]");
        assert!(ensemble.is_none());
        assert_eq!(errors, vec!["<root>: must contain at least one item"]);

        let (path, _) = check::<PointSequence>("[]");
        assert!(path.is_none());
    }

    #[test]
    fn test_well_variants() {
        let (well, errors) = check::<Well>("type: n-molecular well\npoints: [0, 1]\nn: 5\n");
        assert!(errors.is_empty());
        let Some(Well::NMolecular(well)) = well else {
            panic!("expected n-molecular well");
        };
        assert_eq!(well.n(), 2);

        let (_, errors) = check::<Well>("type: bimolecular well\npoint: 0\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("type: unknown Well type 'bimolecular well'"));
    }

    #[test]
    fn test_transition_state_order() {
        let (ts, errors) = check::<SaddlePoint>("type: transition state\npoint: 0\n");
        assert!(errors.is_empty());
        assert_eq!(ts.unwrap().order(), 1);

        let (ts, errors) = check::<SaddlePoint>("type: transition state\norder: 1\npoint: 0\n");
        assert!(errors.is_empty());
        assert!(ts.is_some());

        let (ts, errors) = check::<SaddlePoint>("type: transition state\norder: 2\npoint: 0\n");
        assert!(ts.is_none());
        assert_eq!(errors, vec!["order: transition state order must be 1, got 2"]);
    }

    #[test]
    fn test_nth_order_saddle_point_order() {
        let (sp, errors) = check::<SaddlePoint>("type: nth-order saddle point\norder: 2\npoint: 0\n");
        assert!(errors.is_empty());
        assert_eq!(sp.unwrap().order(), 2);

        let (_, errors) = check::<SaddlePoint>("type: nth-order saddle point\norder: 1\npoint: 0\n");
        assert_eq!(errors, vec!["order: must be an integer >= 2, got 1"]);
    }

    #[test]
    fn test_pes_reaction_requires_two_stages() {
        let (reaction, errors) = check::<PesReaction>(
            "stages:\n  - {type: unimolecular well, point: 0}\n\
             saddle_point: {type: transition state, point: 1}\n",
        );
        assert!(reaction.is_none());
        assert_eq!(errors, vec!["stages: stages must hold exactly 2 wells, got 1"]);
    }

    #[test]
    fn test_pes_reaction() {
        let (reaction, errors) = check::<PesReaction>(
            "stages:\n\
             \x20 - {type: unimolecular well, point: 0}\n\
             \x20 - {type: n-molecular well, points: [1, [[2, 1], [3, 2]]]}\n\
             saddle_point: {type: transition state, point: 4}\n\
             irc_scan_forward: [4, 5, 0]\n",
        );
        assert!(errors.is_empty(), "{errors:?}");
        let reaction = reaction.unwrap();
        assert_eq!(reaction.stages[1].tag(), Well::N_MOLECULAR);
        assert_eq!(reaction.irc_scan_forward.unwrap().points().len(), 3);
        assert!(reaction.irc_scan_backward.is_none());
    }
}
