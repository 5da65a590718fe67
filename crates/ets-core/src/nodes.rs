//! Typed node handles.
//!
//! Every node is a (kind, property-map) pair in the store; the handles here
//! give each kind a type-checked accessor surface over its known fields.
//! Handles are plain copies of a [`NodeId`] and borrow the store per call.

use crate::model::{EdgeKind, NodeKind, OffsetUnitType, Value, props};
use crate::store::{NodeId, Store, StoreError, Tx};

macro_rules! node_handle {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(NodeId);

        impl $name {
            pub const KIND: NodeKind = $kind;

            /// Wrap an existing node, checking its kind.
            pub fn from_node(store: &Store, node: NodeId) -> Result<Self, StoreError> {
                let found = store.node_kind(node);
                if found != Self::KIND {
                    return Err(StoreError::KindMismatch {
                        expected: Self::KIND,
                        found,
                    });
                }
                Ok(Self(node))
            }

            pub(crate) fn wrap(node: NodeId) -> Self {
                Self(node)
            }

            pub fn node(self) -> NodeId {
                self.0
            }
        }
    };
}

node_handle!(
    /// A registry country.
    Country,
    NodeKind::Country
);
node_handle!(
    /// An account-holding company, resolved by name.
    Company,
    NodeKind::Company
);
node_handle!(
    /// A regulated stationary installation.
    Installation,
    NodeKind::Installation
);
node_handle!(
    /// A regulated aircraft operator.
    AircraftOperator,
    NodeKind::AircraftOperator
);
node_handle!(
    /// A main-activity sector.
    Sector,
    NodeKind::Sector
);
node_handle!(
    /// An analysis sector taxonomy entry.
    SandbagSector,
    NodeKind::SandbagSector
);
node_handle!(
    /// A NACE economic-activity code.
    NaceCode,
    NodeKind::NaceCode
);
node_handle!(
    /// A fuel type.
    FuelType,
    NodeKind::FuelType
);
node_handle!(
    /// A time bucket: a calendar year or a named multi-year span.
    Period,
    NodeKind::Period
);
node_handle!(
    /// An offset-generating project.
    Project,
    NodeKind::Project
);
node_handle!(
    /// An emission-offset transaction record.
    Offset,
    NodeKind::Offset
);

impl Country {
    pub fn id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::ID)
    }

    pub fn name(self, store: &Store) -> &str {
        store.prop_str(self.0, props::NAME)
    }
}

impl Company {
    pub fn name(self, store: &Store) -> &str {
        store.prop_str(self.0, props::NAME)
    }

    pub fn registration_number(self, store: &Store) -> &str {
        store.prop_str(self.0, props::company::REGISTRATION_NUMBER)
    }

    pub fn city(self, store: &Store) -> &str {
        store.prop_str(self.0, props::company::CITY)
    }

    pub fn status(self, store: &Store) -> &str {
        store.prop_str(self.0, props::company::STATUS)
    }
}

impl Installation {
    pub fn id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::ID)
    }

    pub fn name(self, store: &Store) -> &str {
        store.prop_str(self.0, props::NAME)
    }

    pub fn city(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::CITY)
    }

    pub fn post_code(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::POST_CODE)
    }

    pub fn address(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::ADDRESS)
    }

    pub fn eprtr_id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::EPRTR_ID)
    }

    pub fn permit_id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::PERMIT_ID)
    }

    pub fn permit_entry_date(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::PERMIT_ENTRY_DATE)
    }

    pub fn permit_expiry_or_revocation_date(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::PERMIT_EXPIRY_OR_REVOCATION_DATE)
    }

    pub fn latitude(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::LATITUDE)
    }

    pub fn longitude(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::LONGITUDE)
    }

    pub fn power_flag(self, store: &Store) -> bool {
        store
            .prop(self.0, props::installation::POWER_FLAG)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn power_flag_reason(self, store: &Store) -> &str {
        store.prop_str(self.0, props::installation::POWER_FLAG_REASON)
    }

    /// Overwrite the derived classification attributes. Recomputed in full
    /// on every classification run.
    pub fn set_power_flag(self, tx: &mut Tx, flag: bool, reason: &str) -> Result<(), StoreError> {
        tx.set_prop(self.0, props::installation::POWER_FLAG, flag)?;
        tx.set_prop(self.0, props::installation::POWER_FLAG_REASON, reason)
    }

    pub fn country(self, store: &Store) -> Option<Country> {
        store.association(self.0, EdgeKind::Country).map(Country)
    }

    pub fn company(self, store: &Store) -> Option<Company> {
        store.association(self.0, EdgeKind::Company).map(Company)
    }

    pub fn sector(self, store: &Store) -> Option<Sector> {
        store.association(self.0, EdgeKind::Sector).map(Sector)
    }

    pub fn nace_code(self, store: &Store) -> Option<NaceCode> {
        store.association(self.0, EdgeKind::NaceCode).map(NaceCode)
    }

    pub fn fuel_type(self, store: &Store) -> Option<FuelType> {
        store.association(self.0, EdgeKind::FuelType).map(FuelType)
    }
}

impl AircraftOperator {
    pub fn id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::ID)
    }

    /// Rewrite the composite id (index maintained). Exists for the one
    /// documented data correction; imports never re-key an operator.
    pub fn set_id(self, tx: &mut Tx, id: &str) -> Result<(), StoreError> {
        tx.set_prop(self.0, props::ID, id)
    }

    pub fn name(self, store: &Store) -> &str {
        store.prop_str(self.0, props::NAME)
    }

    pub fn city(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::CITY)
    }

    pub fn post_code(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::POST_CODE)
    }

    pub fn address(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::ADDRESS)
    }

    pub fn eprtr_id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::EPRTR_ID)
    }

    pub fn status(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::STATUS)
    }

    pub fn unique_code(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::UNIQUE_CODE)
    }

    pub fn monitoring_plan_id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::MONITORING_PLAN_ID)
    }

    pub fn monitoring_plan_first_year(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::MONITORING_PLAN_FIRST_YEAR)
    }

    pub fn monitoring_plan_year_of_expiry(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::MONITORING_PLAN_YEAR_OF_EXPIRY)
    }

    pub fn icao_designator(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::ICAO_DESIGNATOR)
    }

    pub fn latitude(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::LATITUDE)
    }

    pub fn longitude(self, store: &Store) -> &str {
        store.prop_str(self.0, props::aircraft_operator::LONGITUDE)
    }

    pub fn country(self, store: &Store) -> Option<Country> {
        store.association(self.0, EdgeKind::Country).map(Country)
    }

    pub fn company(self, store: &Store) -> Option<Company> {
        store.association(self.0, EdgeKind::Company).map(Company)
    }

    pub fn sector(self, store: &Store) -> Option<Sector> {
        store.association(self.0, EdgeKind::Sector).map(Sector)
    }
}

impl Sector {
    pub fn id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::ID)
    }

    pub fn name(self, store: &Store) -> &str {
        store.prop_str(self.0, props::NAME)
    }
}

impl SandbagSector {
    pub fn id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::ID)
    }

    pub fn name(self, store: &Store) -> &str {
        store.prop_str(self.0, props::NAME)
    }
}

impl NaceCode {
    pub fn id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::ID)
    }

    pub fn description(self, store: &Store) -> &str {
        store.prop_str(self.0, props::nace_code::DESCRIPTION)
    }
}

impl FuelType {
    pub fn name(self, store: &Store) -> &str {
        store.prop_str(self.0, props::NAME)
    }
}

impl Period {
    pub fn name(self, store: &Store) -> &str {
        store.prop_str(self.0, props::NAME)
    }
}

impl Project {
    pub fn id(self, store: &Store) -> &str {
        store.prop_str(self.0, props::ID)
    }
}

impl Offset {
    pub fn amount(self, store: &Store) -> f64 {
        store
            .prop(self.0, props::offset::AMOUNT)
            .and_then(Value::as_num)
            .unwrap_or(0.0)
    }

    pub fn unit_type(self, store: &Store) -> OffsetUnitType {
        OffsetUnitType::from_token(store.prop_str(self.0, props::offset::UNIT_TYPE))
    }
}
