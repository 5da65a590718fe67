//! Graph data model for the emissions-trading registry.
//!
//! Node kinds, edge kinds, natural keys, and property values. Every node is
//! a (kind, property-map) pair; the known fields of each kind are exposed
//! through the typed handles in [`crate::nodes`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Country,
    Company,
    Installation,
    AircraftOperator,
    Sector,
    SandbagSector,
    NaceCode,
    FuelType,
    Period,
    Project,
    Offset,
}

impl NodeKind {
    /// All node kinds, in a stable display order.
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Country,
        NodeKind::Company,
        NodeKind::Installation,
        NodeKind::AircraftOperator,
        NodeKind::Sector,
        NodeKind::SandbagSector,
        NodeKind::NaceCode,
        NodeKind::FuelType,
        NodeKind::Period,
        NodeKind::Project,
        NodeKind::Offset,
    ];

    /// Properties of this kind backed by the prepared key index.
    ///
    /// Resolution by any other property is unsupported; the import workload
    /// is infeasible without indexed lookup.
    pub fn indexed_props(self) -> &'static [&'static str] {
        match self {
            NodeKind::Country => &[props::ID, props::NAME],
            NodeKind::Company => &[props::NAME, props::company::REGISTRATION_NUMBER],
            NodeKind::Installation => &[props::ID],
            NodeKind::AircraftOperator => &[props::ID, props::aircraft_operator::UNIQUE_CODE],
            NodeKind::Sector | NodeKind::SandbagSector => &[props::ID, props::NAME],
            NodeKind::NaceCode => &[props::ID],
            NodeKind::FuelType => &[props::NAME],
            NodeKind::Period => &[props::NAME],
            NodeKind::Project => &[props::ID],
            NodeKind::Offset => &[],
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Country => "country",
            NodeKind::Company => "company",
            NodeKind::Installation => "installation",
            NodeKind::AircraftOperator => "aircraft_operator",
            NodeKind::Sector => "sector",
            NodeKind::SandbagSector => "sandbag_sector",
            NodeKind::NaceCode => "nace_code",
            NodeKind::FuelType => "fuel_type",
            NodeKind::Period => "period",
            NodeKind::Project => "project",
            NodeKind::Offset => "offset",
        };
        f.write_str(name)
    }
}

/// The kind of a graph edge.
///
/// Fact edges (regulated entity → Period) carry a `value` (or `code`)
/// property; `Allocation` additionally carries a `type` discriminator.
/// Association edges exist at most once per (source, kind). Offset linkage
/// edges tie an Offset node to its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    // Period-scoped facts
    Allocation,
    VerifiedEmissions,
    SurrenderedUnits,
    Compliance,
    OffsetEntitlement,
    // Associations (at most one per source entity)
    Country,
    Company,
    Sector,
    SandbagSector,
    NaceCode,
    FuelType,
    // Offset linkage
    OffsetFor,
    ForPeriod,
    FromProject,
    OriginatingCountry,
}

impl EdgeKind {
    /// True for the period-scoped fact kinds subject to the upsert rule.
    pub fn is_fact(self) -> bool {
        matches!(
            self,
            EdgeKind::Allocation
                | EdgeKind::VerifiedEmissions
                | EdgeKind::SurrenderedUnits
                | EdgeKind::Compliance
                | EdgeKind::OffsetEntitlement
        )
    }

    /// True for the single-association kinds replaced on re-set.
    pub fn is_association(self) -> bool {
        matches!(
            self,
            EdgeKind::Country
                | EdgeKind::Company
                | EdgeKind::Sector
                | EdgeKind::SandbagSector
                | EdgeKind::NaceCode
                | EdgeKind::FuelType
        )
    }
}

/// Sub-type discriminator for `Allocation` facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationType {
    Standard,
    Ner,
    Article10c,
}

impl AllocationType {
    /// The wire token stored in the edge's `type` property.
    pub fn as_str(self) -> &'static str {
        match self {
            AllocationType::Standard => "STANDARD",
            AllocationType::Ner => "NER",
            AllocationType::Article10c => "ARTICLE_10C",
        }
    }

    pub fn parse(token: &str) -> Option<AllocationType> {
        match token {
            "STANDARD" => Some(AllocationType::Standard),
            "NER" => Some(AllocationType::Ner),
            "ARTICLE_10C" => Some(AllocationType::Article10c),
            _ => None,
        }
    }
}

impl fmt::Display for AllocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit type of an offset transaction.
///
/// Source tokens are normalized by prefix; anything unrecognized is kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetUnitType {
    Cer,
    Aau,
    Eru,
    Other(String),
}

impl OffsetUnitType {
    pub fn from_token(token: &str) -> OffsetUnitType {
        if token.starts_with("CER") {
            OffsetUnitType::Cer
        } else if token.starts_with("AAU") {
            OffsetUnitType::Aau
        } else if token.starts_with("ERU") {
            OffsetUnitType::Eru
        } else {
            OffsetUnitType::Other(token.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OffsetUnitType::Cer => "CER",
            OffsetUnitType::Aau => "AAU",
            OffsetUnitType::Eru => "ERU",
            OffsetUnitType::Other(token) => token,
        }
    }
}

impl fmt::Display for OffsetUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite natural key of a regulated entity: registry country code plus
/// the source-local identifier.
///
/// The canonical rendering is the plain concatenation used by the source
/// files for cross-file joins; keeping the parts separate avoids rebuilding
/// the key from ad hoc string concatenation at every call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryId {
    pub country: String,
    pub local: String,
}

impl RegistryId {
    pub fn new(country: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            local: local.into(),
        }
    }

    /// The canonical lookup key: `<country><local>`.
    pub fn key(&self) -> String {
        format!("{}{}", self.country, self.local)
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.country, self.local)
    }
}

/// A scalar property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Property names, shared and per-kind.
pub mod props {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";

    pub mod company {
        pub const REGISTRATION_NUMBER: &str = "registration_number";
        pub const ADDRESS: &str = "address";
        pub const CITY: &str = "city";
        pub const POSTAL_CODE: &str = "postal_code";
        pub const STATUS: &str = "status";
        pub const SUBSIDIARY_OF: &str = "subsidiary_of";
        pub const PARENT_OF: &str = "parent_of";
    }

    pub mod installation {
        pub const CITY: &str = "city";
        pub const POST_CODE: &str = "post_code";
        pub const ADDRESS: &str = "address";
        pub const EPRTR_ID: &str = "eprtr_id";
        pub const PERMIT_ID: &str = "permit_id";
        pub const PERMIT_ENTRY_DATE: &str = "permit_entry_date";
        pub const PERMIT_EXPIRY_OR_REVOCATION_DATE: &str = "permit_expiry_or_revocation_date";
        pub const LATITUDE: &str = "latitude";
        pub const LONGITUDE: &str = "longitude";
        pub const POWER_FLAG: &str = "power_flag";
        pub const POWER_FLAG_REASON: &str = "power_flag_reason";
    }

    pub mod aircraft_operator {
        pub const CITY: &str = "city";
        pub const POST_CODE: &str = "post_code";
        pub const ADDRESS: &str = "address";
        pub const EPRTR_ID: &str = "eprtr_id";
        pub const STATUS: &str = "status";
        pub const UNIQUE_CODE: &str = "unique_code";
        pub const MONITORING_PLAN_ID: &str = "monitoring_plan_id";
        pub const MONITORING_PLAN_FIRST_YEAR: &str = "monitoring_plan_first_year_of_applicability";
        pub const MONITORING_PLAN_YEAR_OF_EXPIRY: &str = "monitoring_plan_year_of_expiry";
        pub const ICAO_DESIGNATOR: &str = "icao_designator";
        pub const LATITUDE: &str = "latitude";
        pub const LONGITUDE: &str = "longitude";
    }

    pub mod nace_code {
        pub const DESCRIPTION: &str = "description";
    }

    pub mod offset {
        pub const AMOUNT: &str = "amount";
        pub const UNIT_TYPE: &str = "unit_type";
    }

    pub mod fact {
        pub const VALUE: &str = "value";
        pub const CODE: &str = "code";
        pub const TYPE: &str = "type";
        pub const NOTE: &str = "note";
        pub const SOURCE: &str = "source";
    }
}
