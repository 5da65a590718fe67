//! Fixed-order import orchestration.
//!
//! Entities that facts reference must exist before the facts arrive:
//! installations and aircraft operators first, the data correction, then
//! compliance, allocations, entitlements, and offsets. Unresolved
//! references are never queued or retried — recovering from a partial run
//! means re-running the whole pipeline, which is safe because every create
//! path is resolve-then-create.

use crate::report::ImportReport;
use crate::{
    ImportError, aircraft_operators, allocations, compliance, entitlements, fixes, installations,
    offsets,
};
use ets_core::config::RegistryConfig;
use ets_core::store::Store;
use std::path::PathBuf;
use tracing::info;

/// One path per source format, mirroring the import command's arguments.
#[derive(Debug, Clone)]
pub struct ImportPaths {
    pub installations: PathBuf,
    pub aircraft_operators: PathBuf,
    pub compliance: PathBuf,
    pub ner_allocation: PathBuf,
    pub article10c_allocation: PathBuf,
    pub installation_entitlements: PathBuf,
    pub aircraft_operator_entitlements: PathBuf,
    pub offsets: PathBuf,
}

/// Run every decoder in dependency order and consolidate their reports.
pub fn run(
    store: &mut Store,
    config: &RegistryConfig,
    paths: &ImportPaths,
) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();

    report
        .stages
        .push(installations::import_folder(store, config, &paths.installations)?);
    report.stages.push(aircraft_operators::import_folder(
        store,
        config,
        &paths.aircraft_operators,
    )?);

    fixes::repoint_misfiled_aircraft_operator(store)?;

    report
        .stages
        .push(compliance::import_folder(store, config, &paths.compliance)?);
    report
        .stages
        .push(allocations::import_ner_file(store, config, &paths.ner_allocation)?);
    report.stages.push(allocations::import_article10c_file(
        store,
        config,
        &paths.article10c_allocation,
    )?);
    report.stages.push(entitlements::import_file(
        store,
        config,
        &paths.installation_entitlements,
        entitlements::EntitlementTarget::Installations,
    )?);
    report.stages.push(entitlements::import_file(
        store,
        config,
        &paths.aircraft_operator_entitlements,
        entitlements::EntitlementTarget::AircraftOperators,
    )?);
    report
        .stages
        .push(offsets::import_folder(store, config, &paths.offsets)?);

    info!(
        "import complete: {} rows processed, {} rows skipped, {} facts dropped",
        report.rows_processed(),
        report.rows_skipped(),
        report.facts_dropped()
    );
    Ok(report)
}
