//! Typed entity creation.
//!
//! Creation seeds carry the attribute set each source row supplies; the
//! typed `create_*` helpers assert key absence before creating, so resolving
//! first and creating second is the only path that cannot fail with
//! [`StoreError::DuplicateKey`].

use crate::model::{EdgeKind, NodeKind, OffsetUnitType, RegistryId, props};
use crate::nodes::{
    AircraftOperator, Company, Country, FuelType, Installation, NaceCode, Offset, Period, Project,
    SandbagSector, Sector,
};
use crate::store::{StoreError, Tx};

/// The property a kind is resolved by, and on which uniqueness is enforced.
/// Secondary indexed properties are lookup-only.
pub fn natural_key_prop(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Country | NodeKind::Company | NodeKind::FuelType | NodeKind::Period => {
            Some(props::NAME)
        }
        NodeKind::Installation
        | NodeKind::AircraftOperator
        | NodeKind::Sector
        | NodeKind::SandbagSector
        | NodeKind::NaceCode
        | NodeKind::Project => Some(props::ID),
        NodeKind::Offset => None,
    }
}

/// Attribute set of a company row. Companies have no stable id in the source
/// data and are keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CompanySeed {
    pub name: String,
    pub registration_number: String,
    pub postal_code: String,
    pub city: String,
    pub address: String,
    pub status: String,
    pub subsidiary_of: String,
    pub parent_of: String,
}

/// Attribute set of an installation row.
#[derive(Debug, Clone)]
pub struct InstallationSeed {
    pub id: RegistryId,
    pub name: String,
    pub city: String,
    pub post_code: String,
    pub address: String,
    pub eprtr_id: String,
    pub permit_id: String,
    pub permit_entry_date: String,
    pub permit_expiry_or_revocation_date: String,
    pub latitude: String,
    pub longitude: String,
}

/// Attribute set of an aircraft-operator row.
#[derive(Debug, Clone)]
pub struct AircraftOperatorSeed {
    pub id: RegistryId,
    pub name: String,
    pub city: String,
    pub post_code: String,
    pub address: String,
    pub eprtr_id: String,
    pub status: String,
    pub unique_code: String,
    pub monitoring_plan_id: String,
    pub monitoring_plan_first_year: String,
    pub monitoring_plan_year_of_expiry: String,
    pub icao_designator: String,
    pub latitude: String,
    pub longitude: String,
}

impl Tx<'_> {
    fn assert_absent(
        &self,
        kind: NodeKind,
        prop: &'static str,
        key: &str,
    ) -> Result<(), StoreError> {
        if !key.is_empty() && self.find_node(kind, prop, key).is_some() {
            return Err(StoreError::DuplicateKey {
                kind,
                prop,
                value: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn create_country(&mut self, name: &str, id: &str) -> Result<Country, StoreError> {
        self.assert_absent(NodeKind::Country, props::NAME, name)?;
        let node = self.create_node(NodeKind::Country);
        self.set_prop(node, props::NAME, name)?;
        self.set_prop(node, props::ID, id)?;
        Ok(Country::wrap(node))
    }

    pub fn create_company(&mut self, seed: &CompanySeed) -> Result<Company, StoreError> {
        self.assert_absent(NodeKind::Company, props::NAME, &seed.name)?;
        let node = self.create_node(NodeKind::Company);
        self.set_prop(node, props::NAME, seed.name.as_str())?;
        self.set_prop(
            node,
            props::company::REGISTRATION_NUMBER,
            seed.registration_number.as_str(),
        )?;
        self.set_prop(node, props::company::POSTAL_CODE, seed.postal_code.as_str())?;
        self.set_prop(node, props::company::CITY, seed.city.as_str())?;
        self.set_prop(node, props::company::ADDRESS, seed.address.as_str())?;
        self.set_prop(node, props::company::STATUS, seed.status.as_str())?;
        self.set_prop(
            node,
            props::company::SUBSIDIARY_OF,
            seed.subsidiary_of.as_str(),
        )?;
        self.set_prop(node, props::company::PARENT_OF, seed.parent_of.as_str())?;
        Ok(Company::wrap(node))
    }

    pub fn create_sector(&mut self, id: &str, name: &str) -> Result<Sector, StoreError> {
        self.assert_absent(NodeKind::Sector, props::ID, id)?;
        let node = self.create_node(NodeKind::Sector);
        self.set_prop(node, props::ID, id)?;
        self.set_prop(node, props::NAME, name)?;
        Ok(Sector::wrap(node))
    }

    pub fn create_sandbag_sector(
        &mut self,
        id: &str,
        name: &str,
    ) -> Result<SandbagSector, StoreError> {
        self.assert_absent(NodeKind::SandbagSector, props::ID, id)?;
        let node = self.create_node(NodeKind::SandbagSector);
        self.set_prop(node, props::ID, id)?;
        self.set_prop(node, props::NAME, name)?;
        Ok(SandbagSector::wrap(node))
    }

    pub fn create_nace_code(&mut self, id: &str, description: &str) -> Result<NaceCode, StoreError> {
        self.assert_absent(NodeKind::NaceCode, props::ID, id)?;
        let node = self.create_node(NodeKind::NaceCode);
        self.set_prop(node, props::ID, id)?;
        self.set_prop(node, props::nace_code::DESCRIPTION, description)?;
        Ok(NaceCode::wrap(node))
    }

    pub fn create_fuel_type(&mut self, name: &str) -> Result<FuelType, StoreError> {
        self.assert_absent(NodeKind::FuelType, props::NAME, name)?;
        let node = self.create_node(NodeKind::FuelType);
        self.set_prop(node, props::NAME, name)?;
        Ok(FuelType::wrap(node))
    }

    pub fn create_period(&mut self, name: &str) -> Result<Period, StoreError> {
        self.assert_absent(NodeKind::Period, props::NAME, name)?;
        let node = self.create_node(NodeKind::Period);
        self.set_prop(node, props::NAME, name)?;
        Ok(Period::wrap(node))
    }

    pub fn create_project(&mut self, id: &str) -> Result<Project, StoreError> {
        self.assert_absent(NodeKind::Project, props::ID, id)?;
        let node = self.create_node(NodeKind::Project);
        self.set_prop(node, props::ID, id)?;
        Ok(Project::wrap(node))
    }

    /// Create an installation with its attribute set and associations.
    /// `power_flag` starts `false`/`""`; the classification pass owns it.
    pub fn create_installation(
        &mut self,
        seed: &InstallationSeed,
        country: Option<Country>,
        company: Option<Company>,
        sector: Option<Sector>,
    ) -> Result<Installation, StoreError> {
        let key = seed.id.key();
        self.assert_absent(NodeKind::Installation, props::ID, &key)?;

        let node = self.create_node(NodeKind::Installation);
        self.set_prop(node, props::ID, key)?;
        self.set_prop(node, props::NAME, seed.name.as_str())?;
        self.set_prop(node, props::installation::CITY, seed.city.as_str())?;
        self.set_prop(node, props::installation::POST_CODE, seed.post_code.as_str())?;
        self.set_prop(node, props::installation::ADDRESS, seed.address.as_str())?;
        self.set_prop(node, props::installation::EPRTR_ID, seed.eprtr_id.as_str())?;
        self.set_prop(node, props::installation::PERMIT_ID, seed.permit_id.as_str())?;
        self.set_prop(
            node,
            props::installation::PERMIT_ENTRY_DATE,
            seed.permit_entry_date.as_str(),
        )?;
        self.set_prop(
            node,
            props::installation::PERMIT_EXPIRY_OR_REVOCATION_DATE,
            seed.permit_expiry_or_revocation_date.as_str(),
        )?;
        self.set_prop(node, props::installation::LATITUDE, seed.latitude.as_str())?;
        self.set_prop(node, props::installation::LONGITUDE, seed.longitude.as_str())?;
        self.set_prop(node, props::installation::POWER_FLAG, false)?;
        self.set_prop(node, props::installation::POWER_FLAG_REASON, "")?;

        if let Some(country) = country {
            self.add_edge(node, country.node(), EdgeKind::Country);
        }
        if let Some(company) = company {
            self.add_edge(node, company.node(), EdgeKind::Company);
        }
        if let Some(sector) = sector {
            self.add_edge(node, sector.node(), EdgeKind::Sector);
        }
        Ok(Installation::wrap(node))
    }

    /// Create an aircraft operator with its attribute set and associations.
    pub fn create_aircraft_operator(
        &mut self,
        seed: &AircraftOperatorSeed,
        country: Option<Country>,
        company: Option<Company>,
        sector: Option<Sector>,
    ) -> Result<AircraftOperator, StoreError> {
        let key = seed.id.key();
        self.assert_absent(NodeKind::AircraftOperator, props::ID, &key)?;

        let node = self.create_node(NodeKind::AircraftOperator);
        self.set_prop(node, props::ID, key)?;
        self.set_prop(node, props::NAME, seed.name.as_str())?;
        self.set_prop(node, props::aircraft_operator::CITY, seed.city.as_str())?;
        self.set_prop(
            node,
            props::aircraft_operator::POST_CODE,
            seed.post_code.as_str(),
        )?;
        self.set_prop(node, props::aircraft_operator::ADDRESS, seed.address.as_str())?;
        self.set_prop(node, props::aircraft_operator::EPRTR_ID, seed.eprtr_id.as_str())?;
        self.set_prop(node, props::aircraft_operator::STATUS, seed.status.as_str())?;
        self.set_prop(
            node,
            props::aircraft_operator::UNIQUE_CODE,
            seed.unique_code.as_str(),
        )?;
        self.set_prop(
            node,
            props::aircraft_operator::MONITORING_PLAN_ID,
            seed.monitoring_plan_id.as_str(),
        )?;
        self.set_prop(
            node,
            props::aircraft_operator::MONITORING_PLAN_FIRST_YEAR,
            seed.monitoring_plan_first_year.as_str(),
        )?;
        self.set_prop(
            node,
            props::aircraft_operator::MONITORING_PLAN_YEAR_OF_EXPIRY,
            seed.monitoring_plan_year_of_expiry.as_str(),
        )?;
        self.set_prop(
            node,
            props::aircraft_operator::ICAO_DESIGNATOR,
            seed.icao_designator.as_str(),
        )?;
        self.set_prop(node, props::aircraft_operator::LATITUDE, seed.latitude.as_str())?;
        self.set_prop(
            node,
            props::aircraft_operator::LONGITUDE,
            seed.longitude.as_str(),
        )?;

        if let Some(country) = country {
            self.add_edge(node, country.node(), EdgeKind::Country);
        }
        if let Some(company) = company {
            self.add_edge(node, company.node(), EdgeKind::Company);
        }
        if let Some(sector) = sector {
            self.add_edge(node, sector.node(), EdgeKind::Sector);
        }
        Ok(AircraftOperator::wrap(node))
    }

    /// Create an offset transaction record. Offsets carry no natural key and
    /// are never resolved; every import row yields a fresh node.
    pub fn create_offset(
        &mut self,
        amount: f64,
        unit_type: &OffsetUnitType,
    ) -> Result<Offset, StoreError> {
        let node = self.create_node(NodeKind::Offset);
        self.set_prop(node, props::offset::AMOUNT, amount)?;
        self.set_prop(node, props::offset::UNIT_TYPE, unit_type.as_str())?;
        Ok(Offset::wrap(node))
    }
}
