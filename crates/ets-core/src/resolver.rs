//! Get-or-create helpers: the merge engine's public face.
//!
//! Each helper resolves by the key the current source file uses and creates
//! the entity with whatever attributes the current row supplies. The merge
//! policy that falls out is deliberate and documented: **first writer wins
//! for entity attributes, last writer wins for period-scoped facts**. A
//! later file that re-encounters an entity adds or overwrites facts but
//! never backfills attributes unless it calls a setter explicitly. Under
//! the single-writer sequential execution model this makes every import
//! re-runnable: each create path is resolve-then-create.

use crate::facts::Regulated;
use crate::model::{NodeKind, props};
use crate::nodes::{
    AircraftOperator, Company, Country, FuelType, Installation, NaceCode, Period, Project,
    SandbagSector, Sector,
};
use crate::registry::{AircraftOperatorSeed, CompanySeed, InstallationSeed};
use crate::store::{Store, StoreError, Tx};

impl Store {
    /// Country by registry code. Lookup only; countries are created by name.
    pub fn country_by_id(&self, id: &str) -> Option<Country> {
        self.find_node(NodeKind::Country, props::ID, id)
            .map(Country::wrap)
    }

    pub fn country_by_name(&self, name: &str) -> Option<Country> {
        self.find_node(NodeKind::Country, props::NAME, name)
            .map(Country::wrap)
    }

    pub fn company_by_name(&self, name: &str) -> Option<Company> {
        self.find_node(NodeKind::Company, props::NAME, name)
            .map(Company::wrap)
    }

    /// Secondary-key company lookup. Import resolution is name-keyed; this
    /// exists for callers reconciling against the registration number.
    pub fn company_by_registration_number(&self, registration_number: &str) -> Option<Company> {
        self.find_node(
            NodeKind::Company,
            props::company::REGISTRATION_NUMBER,
            registration_number,
        )
        .map(Company::wrap)
    }

    pub fn installation(&self, key: &str) -> Option<Installation> {
        self.find_node(NodeKind::Installation, props::ID, key)
            .map(Installation::wrap)
    }

    pub fn aircraft_operator(&self, key: &str) -> Option<AircraftOperator> {
        self.find_node(NodeKind::AircraftOperator, props::ID, key)
            .map(AircraftOperator::wrap)
    }

    pub fn aircraft_operator_by_unique_code(&self, code: &str) -> Option<AircraftOperator> {
        self.find_node(
            NodeKind::AircraftOperator,
            props::aircraft_operator::UNIQUE_CODE,
            code,
        )
        .map(AircraftOperator::wrap)
    }

    pub fn period(&self, name: &str) -> Option<Period> {
        self.find_node(NodeKind::Period, props::NAME, name)
            .map(Period::wrap)
    }

    pub fn sector_by_id(&self, id: &str) -> Option<Sector> {
        self.find_node(NodeKind::Sector, props::ID, id).map(Sector::wrap)
    }

    pub fn sandbag_sector_by_id(&self, id: &str) -> Option<SandbagSector> {
        self.find_node(NodeKind::SandbagSector, props::ID, id)
            .map(SandbagSector::wrap)
    }

    pub fn nace_code_by_id(&self, id: &str) -> Option<NaceCode> {
        self.find_node(NodeKind::NaceCode, props::ID, id)
            .map(NaceCode::wrap)
    }

    pub fn fuel_type_by_name(&self, name: &str) -> Option<FuelType> {
        self.find_node(NodeKind::FuelType, props::NAME, name)
            .map(FuelType::wrap)
    }

    pub fn project_by_id(&self, id: &str) -> Option<Project> {
        self.find_node(NodeKind::Project, props::ID, id)
            .map(Project::wrap)
    }

    /// Resolve a regulated entity by composite key: Installation first,
    /// AircraftOperator second. Compliance and offset files identify both
    /// kinds through the same id column, so the fallback order is part of
    /// the import contract.
    pub fn resolve_regulated(&self, key: &str) -> Option<Regulated> {
        if let Some(installation) = self.installation(key) {
            return Some(Regulated::Installation(installation));
        }
        self.aircraft_operator(key).map(Regulated::AircraftOperator)
    }
}

impl Tx<'_> {
    /// Resolve a country by name, creating it with the row's (name, id)
    /// when unseen. Offsets may create registries with an empty id; those
    /// are resolvable by name only.
    pub fn get_or_create_country(&mut self, name: &str, id: &str) -> Result<Country, StoreError> {
        if let Some(country) = self.country_by_name(name) {
            return Ok(country);
        }
        tracing::info!("creating country [{id},{name}]");
        self.create_country(name, id)
    }

    /// Resolve a company by name. Rows without a company name yield `None`;
    /// nothing is created for them.
    pub fn get_or_create_company(
        &mut self,
        seed: &CompanySeed,
    ) -> Result<Option<Company>, StoreError> {
        if seed.name.is_empty() {
            return Ok(None);
        }
        if let Some(company) = self.company_by_name(&seed.name) {
            return Ok(Some(company));
        }
        Ok(Some(self.create_company(seed)?))
    }

    pub fn get_or_create_sector(
        &mut self,
        id: &str,
        name: &str,
    ) -> Result<Option<Sector>, StoreError> {
        if id.is_empty() {
            return Ok(None);
        }
        if let Some(sector) = self.sector_by_id(id) {
            return Ok(Some(sector));
        }
        tracing::info!("creating sector {id} ({name})");
        Ok(Some(self.create_sector(id, name)?))
    }

    pub fn get_or_create_sandbag_sector(
        &mut self,
        id: &str,
        name: &str,
    ) -> Result<Option<SandbagSector>, StoreError> {
        if id.is_empty() {
            return Ok(None);
        }
        if let Some(sector) = self.sandbag_sector_by_id(id) {
            return Ok(Some(sector));
        }
        Ok(Some(self.create_sandbag_sector(id, name)?))
    }

    pub fn get_or_create_nace_code(
        &mut self,
        id: &str,
        description: &str,
    ) -> Result<Option<NaceCode>, StoreError> {
        if id.is_empty() {
            return Ok(None);
        }
        if let Some(nace) = self.nace_code_by_id(id) {
            return Ok(Some(nace));
        }
        Ok(Some(self.create_nace_code(id, description)?))
    }

    pub fn get_or_create_fuel_type(&mut self, name: &str) -> Result<Option<FuelType>, StoreError> {
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(fuel_type) = self.fuel_type_by_name(name) {
            return Ok(Some(fuel_type));
        }
        Ok(Some(self.create_fuel_type(name)?))
    }

    pub fn get_or_create_period(&mut self, name: &str) -> Result<Period, StoreError> {
        if let Some(period) = self.period(name) {
            return Ok(period);
        }
        tracing::info!("creating period {name}");
        self.create_period(name)
    }

    pub fn get_or_create_project(&mut self, id: &str) -> Result<Option<Project>, StoreError> {
        if id.is_empty() {
            return Ok(None);
        }
        if let Some(project) = self.project_by_id(id) {
            return Ok(Some(project));
        }
        Ok(Some(self.create_project(id)?))
    }

    /// Resolve an installation by composite key, creating it with this
    /// row's attributes when unseen. An existing installation is returned
    /// untouched: first writer wins for attributes.
    pub fn get_or_create_installation(
        &mut self,
        seed: &InstallationSeed,
        country: Option<Country>,
        company: Option<Company>,
        sector: Option<Sector>,
    ) -> Result<Installation, StoreError> {
        if let Some(installation) = self.installation(&seed.id.key()) {
            return Ok(installation);
        }
        self.create_installation(seed, country, company, sector)
    }

    /// Resolve an aircraft operator by composite key, falling back to the
    /// secondary unique-code key, creating it with this row's attributes
    /// when unseen. The fallback keeps re-imports convergent for the one
    /// operator whose composite id was corrected after import.
    pub fn get_or_create_aircraft_operator(
        &mut self,
        seed: &AircraftOperatorSeed,
        country: Option<Country>,
        company: Option<Company>,
        sector: Option<Sector>,
    ) -> Result<AircraftOperator, StoreError> {
        if let Some(operator) = self.aircraft_operator(&seed.id.key()) {
            return Ok(operator);
        }
        if let Some(operator) = self.aircraft_operator_by_unique_code(&seed.unique_code) {
            return Ok(operator);
        }
        self.create_aircraft_operator(seed, country, company, sector)
    }
}
