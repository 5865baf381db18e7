//! Second validation pass: integer ids and citation keys must resolve
//!
//! Runs over a structurally valid [`Document`]. Each reference that does
//! not resolve yields exactly one `DanglingReference` error at the
//! reference's own location.

use crate::context::Context;
use crate::error::{ErrorKind, ReferenceTarget};
use rmmd_schema::{
    CitationKey, DataSource, Document, EntityPoints, PesReaction, Point, PointId, PointRef,
    QcCalculation, QcCalculationId, Reaction, Species, Well,
};
use tracing::debug;

struct Checker<'d> {
    document: &'d Document,
    ctx: &'d mut Context,
}

/// Check every reference in `document`, reporting into `ctx`
pub fn check(document: &Document, ctx: &mut Context) {
    let before = ctx.errors().len();
    let mut checker = Checker { document, ctx };
    checker.document();
    debug!(
        dangling = checker.ctx.errors().len() - before,
        "Cross-reference pass finished"
    );
}

impl Checker<'_> {
    fn dangling(&mut self, target: ReferenceTarget) {
        let message = target.to_string();
        self.ctx
            .report(ErrorKind::DanglingReference { target }, message);
    }

    fn point_id(&mut self, id: PointId) {
        let len = self.document.points.len();
        if self.document.point(id).is_none() {
            self.dangling(ReferenceTarget::Point { id: id.0, len });
        }
    }

    fn calculation_id(&mut self, id: QcCalculationId) {
        let len = self.document.calculations.len();
        if self.document.calculation(id).is_none() {
            self.dangling(ReferenceTarget::Calculation { id: id.0, len });
        }
    }

    fn citation_key(&mut self, key: &CitationKey) {
        if !self.document.literature.contains_key(key) {
            self.dangling(ReferenceTarget::Literature {
                key: key.to_string(),
            });
        }
    }

    fn citation_keys(&mut self, field: &str, keys: Option<&[CitationKey]>) {
        let Some(keys) = keys else {
            return;
        };
        self.ctx.in_field(field, |ctx| {
            for (idx, key) in keys.iter().enumerate() {
                ctx.in_index(idx, |ctx| {
                    Checker {
                        document: self.document,
                        ctx,
                    }
                    .citation_key(key);
                });
            }
        });
    }

    fn document(&mut self) {
        let document = self.document;

        self.ctx.in_field("species", |ctx| {
            for (name, species) in &document.species {
                ctx.in_key(name.as_str(), |ctx| Checker { document, ctx }.species(species));
            }
        });
        self.ctx.in_field("reactions", |ctx| {
            for (idx, reaction) in document.reactions.iter().enumerate() {
                ctx.in_index(idx, |ctx| Checker { document, ctx }.reaction(reaction));
            }
        });
        self.ctx.in_field("points", |ctx| {
            for (idx, point) in document.points.iter().enumerate() {
                ctx.in_index(idx, |ctx| Checker { document, ctx }.point(point));
            }
        });
        self.ctx.in_field("calculations", |ctx| {
            for (idx, calculation) in document.calculations.iter().enumerate() {
                ctx.in_index(idx, |ctx| Checker { document, ctx }.calculation(calculation));
            }
        });
        self.citation_keys("references", document.references.as_deref());
    }

    fn species(&mut self, species: &Species) {
        let document = self.document;
        self.ctx.in_field("entities", |ctx| {
            for (idx, entity) in species.entities.iter().enumerate() {
                let EntityPoints::Listed(points) = &entity.points else {
                    continue;
                };
                ctx.in_index(idx, |ctx| {
                    ctx.in_field("points", |ctx| {
                        for (p, point) in points.iter().enumerate() {
                            ctx.in_index(p, |ctx| Checker { document, ctx }.point(point));
                        }
                    });
                });
            }
        });
    }

    fn reaction(&mut self, reaction: &Reaction) {
        let document = self.document;
        self.ctx.in_field("nodes", |ctx| {
            for (idx, node) in reaction.nodes.iter().enumerate() {
                ctx.in_index(idx, |ctx| {
                    ctx.in_field("species", |ctx| Checker { document, ctx }.species(&node.species));
                });
            }
        });
        self.ctx.in_field("definition", |ctx| {
            let mut checker = Checker { document, ctx };
            checker.citation_keys("references", reaction.definition.references.as_deref());
            checker
                .ctx
                .in_field("pes_reaction", |ctx| {
                    Checker { document, ctx }.pes_reaction(&reaction.definition.pes_reaction);
                });
        });
    }

    fn pes_reaction(&mut self, reaction: &PesReaction) {
        let document = self.document;
        self.ctx.in_field("stages", |ctx| {
            for (idx, well) in reaction.stages.iter().enumerate() {
                ctx.in_index(idx, |ctx| Checker { document, ctx }.well(well));
            }
        });
        self.ctx.in_field("saddle_point", |ctx| {
            let point = reaction.saddle_point.point();
            ctx.in_field("point", |ctx| Checker { document, ctx }.point_ref(point));
        });
        for (field, scan) in [
            ("irc_scan_forward", &reaction.irc_scan_forward),
            ("irc_scan_backward", &reaction.irc_scan_backward),
        ] {
            let Some(scan) = scan else {
                continue;
            };
            self.ctx.in_field(field, |ctx| {
                for (idx, &id) in scan.points().iter().enumerate() {
                    ctx.in_index(idx, |ctx| Checker { document, ctx }.point_id(id));
                }
            });
        }
    }

    fn well(&mut self, well: &Well) {
        let document = self.document;
        match well {
            Well::Unimolecular(w) => {
                self.ctx.in_field("point", |ctx| Checker { document, ctx }.point_ref(&w.point));
            }
            Well::VdWComplex(w) => {
                self.ctx.in_field("point", |ctx| Checker { document, ctx }.point_ref(&w.point));
            }
            Well::NMolecular(w) => {
                self.ctx.in_field("points", |ctx| {
                    for (idx, point) in w.points.iter().enumerate() {
                        ctx.in_index(idx, |ctx| Checker { document, ctx }.point_ref(point));
                    }
                });
            }
        }
    }

    fn point_ref(&mut self, point: &PointRef) {
        match point {
            PointRef::Single(id) => self.point_id(*id),
            PointRef::Ensemble(ensemble) => {
                let document = self.document;
                for (idx, (id, _)) in ensemble.members().iter().enumerate() {
                    self.ctx.in_index(idx, |ctx| {
                        ctx.in_index(0, |ctx| Checker { document, ctx }.point_id(*id));
                    });
                }
            }
        }
    }

    fn point(&mut self, point: &Point) {
        let document = self.document;
        self.ctx.in_field("calculations", |ctx| {
            for (idx, &id) in point.calculations.iter().enumerate() {
                ctx.in_index(idx, |ctx| Checker { document, ctx }.calculation_id(id));
            }
        });
    }

    fn calculation(&mut self, calculation: &QcCalculation) {
        let references = match calculation {
            QcCalculation::Reference(c) => c.references.as_deref(),
            QcCalculation::Data(c) => c.references.as_deref(),
        };
        self.citation_keys("references", references);

        let document = self.document;
        let sources = calculation.sources();
        if sources.is_empty() {
            return;
        }
        self.ctx.in_field("source", |ctx| {
            for (idx, source) in sources.iter().enumerate() {
                if let DataSource::Citation(key) = source {
                    ctx.in_index(idx, |ctx| Checker { document, ctx }.citation_key(key));
                }
            }
        });
    }
}
