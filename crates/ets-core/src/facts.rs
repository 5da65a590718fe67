//! Period-scoped facts and association edges.
//!
//! The upsert rule here is the central merge policy: independently-sourced
//! files converge on one graph because a fact for an already-seen
//! (entity, period, kind, subtype) tuple overwrites the value in place
//! instead of growing a duplicate edge. Associations are simpler — each
//! entity holds at most one edge of a given association kind, so setting
//! one replaces whatever was there.

use crate::model::{AllocationType, EdgeKind, Value, props};
use crate::nodes::{
    AircraftOperator, Company, Country, FuelType, Installation, NaceCode, Offset, Period, Project,
    SandbagSector, Sector,
};
use crate::store::{EdgeId, NodeId, Store, Tx};

/// A regulated entity: the only two kinds facts attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regulated {
    Installation(Installation),
    AircraftOperator(AircraftOperator),
}

impl Regulated {
    pub fn node(self) -> NodeId {
        match self {
            Regulated::Installation(i) => i.node(),
            Regulated::AircraftOperator(a) => a.node(),
        }
    }
}

/// Find the fact edge for (source, period, kind, subtype), or create it.
fn fact_edge(
    tx: &mut Tx,
    source: NodeId,
    period: Period,
    kind: EdgeKind,
    subtype: Option<AllocationType>,
) -> EdgeId {
    debug_assert!(kind.is_fact());
    let existing = tx
        .out_edges(source, Some(kind))
        .find(|(_, edge)| {
            edge.target == period.node()
                && match subtype {
                    Some(t) => {
                        edge.props.get(props::fact::TYPE).and_then(Value::as_str)
                            == Some(t.as_str())
                    }
                    None => true,
                }
        })
        .map(|(id, _)| id);

    match existing {
        Some(id) => id,
        None => {
            let id = tx.add_edge(source, period.node(), kind);
            if let Some(t) = subtype {
                tx.set_edge_prop(id, props::fact::TYPE, t.as_str());
            }
            id
        }
    }
}

/// Replace the at-most-one association edge of `kind` from `source`.
pub fn set_association(tx: &mut Tx, source: NodeId, kind: EdgeKind, target: NodeId) -> EdgeId {
    debug_assert!(kind.is_association());
    let stale: Vec<EdgeId> = tx.out_edges(source, Some(kind)).map(|(id, _)| id).collect();
    for id in stale {
        tx.delete_edge(id);
    }
    tx.add_edge(source, target, kind)
}

/// Fact and association operations shared by the two regulated kinds.
pub trait RegulatedNode: Copy {
    fn node(self) -> NodeId;

    fn set_allowances_in_allocation_for_period(
        self,
        tx: &mut Tx,
        period: Period,
        value: f64,
        allocation_type: AllocationType,
    ) {
        let edge = fact_edge(
            tx,
            self.node(),
            period,
            EdgeKind::Allocation,
            Some(allocation_type),
        );
        tx.set_edge_prop(edge, props::fact::VALUE, value);
    }

    fn set_verified_emissions_for_period(self, tx: &mut Tx, period: Period, value: f64) {
        let edge = fact_edge(tx, self.node(), period, EdgeKind::VerifiedEmissions, None);
        tx.set_edge_prop(edge, props::fact::VALUE, value);
    }

    fn set_surrendered_units_for_period(self, tx: &mut Tx, period: Period, value: f64) {
        let edge = fact_edge(tx, self.node(), period, EdgeKind::SurrenderedUnits, None);
        tx.set_edge_prop(edge, props::fact::VALUE, value);
    }

    fn set_compliance_for_period(self, tx: &mut Tx, period: Period, code: &str) {
        let edge = fact_edge(tx, self.node(), period, EdgeKind::Compliance, None);
        tx.set_edge_prop(edge, props::fact::CODE, code);
    }

    fn set_offset_entitlement_for_period(self, tx: &mut Tx, period: Period, value: f64) {
        let edge = fact_edge(tx, self.node(), period, EdgeKind::OffsetEntitlement, None);
        tx.set_edge_prop(edge, props::fact::VALUE, value);
    }

    /// Allocation fact edges of one subtype, across all periods.
    fn allocations_of_type(self, store: &Store, allocation_type: AllocationType) -> Vec<EdgeId> {
        store
            .out_edges(self.node(), Some(EdgeKind::Allocation))
            .filter(|(_, edge)| {
                edge.props.get(props::fact::TYPE).and_then(Value::as_str)
                    == Some(allocation_type.as_str())
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn set_country(self, tx: &mut Tx, country: Country) {
        set_association(tx, self.node(), EdgeKind::Country, country.node());
    }

    fn set_company(self, tx: &mut Tx, company: Company) {
        set_association(tx, self.node(), EdgeKind::Company, company.node());
    }

    fn set_sector(self, tx: &mut Tx, sector: Sector) {
        set_association(tx, self.node(), EdgeKind::Sector, sector.node());
    }

    fn set_sandbag_sector(self, tx: &mut Tx, sector: SandbagSector) {
        set_association(tx, self.node(), EdgeKind::SandbagSector, sector.node());
    }

    fn set_nace_code(self, tx: &mut Tx, nace: NaceCode) {
        set_association(tx, self.node(), EdgeKind::NaceCode, nace.node());
    }

    /// Associate a fuel type, with the optional provenance annotations the
    /// source model carries on this edge.
    fn set_fuel_type(
        self,
        tx: &mut Tx,
        fuel_type: FuelType,
        note: Option<&str>,
        source: Option<&str>,
    ) {
        let edge = set_association(tx, self.node(), EdgeKind::FuelType, fuel_type.node());
        if let Some(note) = note {
            tx.set_edge_prop(edge, props::fact::NOTE, note);
        }
        if let Some(source) = source {
            tx.set_edge_prop(edge, props::fact::SOURCE, source);
        }
    }
}

impl RegulatedNode for Installation {
    fn node(self) -> NodeId {
        Installation::node(self)
    }
}

impl RegulatedNode for AircraftOperator {
    fn node(self) -> NodeId {
        AircraftOperator::node(self)
    }
}

impl RegulatedNode for Regulated {
    fn node(self) -> NodeId {
        Regulated::node(self)
    }
}

/// Attach a freshly created offset to its context: the regulated entity it
/// was recorded against, the compliance period, the optional generating
/// project, and the originating registry country.
pub fn link_offset(
    tx: &mut Tx,
    offset: Offset,
    target: Regulated,
    period: Period,
    project: Option<Project>,
    originating_country: Country,
) {
    tx.add_edge(offset.node(), target.node(), EdgeKind::OffsetFor);
    tx.add_edge(offset.node(), period.node(), EdgeKind::ForPeriod);
    if let Some(project) = project {
        tx.add_edge(offset.node(), project.node(), EdgeKind::FromProject);
    }
    tx.add_edge(
        offset.node(),
        originating_country.node(),
        EdgeKind::OriginatingCountry,
    );
}

/// Numeric value of a fact edge, when set.
pub fn fact_value(store: &Store, edge: EdgeId) -> Option<f64> {
    store.edge(edge).props.get(props::fact::VALUE).and_then(Value::as_num)
}

/// Compliance code of a fact edge, when set.
pub fn fact_code(store: &Store, edge: EdgeId) -> Option<&str> {
    store.edge(edge).props.get(props::fact::CODE).and_then(Value::as_str)
}
