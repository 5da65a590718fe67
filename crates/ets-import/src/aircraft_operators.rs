//! Decoder for aircraft-operator extracts.
//!
//! 28 positional columns per row — the installation layout plus the
//! monitoring-plan block and the ICAO designator. The operator's display
//! name comes from the account-holder company column; its composite id is
//! country code plus the operator column.

use crate::installations::{company_seed, split_main_activity};
use crate::report::{SkipReason, StageReport};
use crate::{ImportError, tsv};
use ets_core::config::RegistryConfig;
use ets_core::model::RegistryId;
use ets_core::registry::AircraftOperatorSeed;
use ets_core::store::Store;
use std::path::Path;
use tracing::info;

pub const COLUMNS: usize = 28;

/// Import every data file in `folder`.
pub fn import_folder(
    store: &mut Store,
    config: &RegistryConfig,
    folder: &Path,
) -> Result<StageReport, ImportError> {
    info!("importing aircraft operators from {}", folder.display());
    let mut report = StageReport::new("aircraft-operators");
    for file in tsv::data_files(folder, &mut report) {
        import_file(store, config, &file, &mut report)?;
    }
    Ok(report)
}

pub fn import_file(
    store: &mut Store,
    config: &RegistryConfig,
    path: &Path,
    report: &mut StageReport,
) -> Result<(), ImportError> {
    info!("importing file {}", path.display());
    let rows = match tsv::RowReader::open(path) {
        Ok(rows) => rows,
        Err(e) => {
            report.skip_file(path, &e.to_string());
            return Ok(());
        }
    };

    let mut tx = store.begin();
    let mut batch = 0usize;
    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                report.skip_file(path, &e.to_string());
                break;
            }
        };
        let f = &row.fields;
        if f.len() != COLUMNS {
            report.skip_row(
                path,
                row.line,
                "",
                SkipReason::ColumnCount {
                    expected: COLUMNS,
                    found: f.len(),
                },
            );
            continue;
        }

        let country = tx.get_or_create_country(&f[0], &f[24])?;
        let company = tx.get_or_create_company(&company_seed(f))?;
        let sector = match split_main_activity(&f[27]) {
            Some((id, name)) => tx.get_or_create_sector(id, name)?,
            None => None,
        };

        let seed = AircraftOperatorSeed {
            id: RegistryId::new(&f[24], &f[11]),
            // Operators are published under their account holder's name.
            name: f[6].clone(),
            city: f[23].clone(),
            post_code: f[22].clone(),
            address: format!("{} {}", f[20], f[21]),
            eprtr_id: f[18].clone(),
            status: f[4].clone(),
            unique_code: f[12].clone(),
            monitoring_plan_id: f[13].clone(),
            monitoring_plan_first_year: f[14].clone(),
            monitoring_plan_year_of_expiry: f[15].clone(),
            icao_designator: f[19].clone(),
            latitude: f[25].clone(),
            longitude: f[26].clone(),
        };
        tx.get_or_create_aircraft_operator(&seed, Some(country), company, sector)?;
        report.rows_processed += 1;

        batch += 1;
        if batch % config.import.entity_batch_rows == 0 {
            info!("{batch} aircraft-operator rows imported...");
            tx.commit()?;
            tx = store.begin();
        }
    }
    tx.commit()?;
    Ok(())
}
