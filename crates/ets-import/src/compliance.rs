//! Decoder for yearly compliance extracts.
//!
//! 7 positional columns: country code, local entity id, year, allowances in
//! allocation, verified emissions, surrendered units, compliance code. The
//! id column names installations and aircraft operators alike, so rows
//! resolve with the Installation-first fallback. Each non-empty field
//! upserts its own fact; a malformed numeric drops that one fact only.

use crate::report::{SkipReason, StageReport};
use crate::{ImportError, tsv};
use ets_core::config::RegistryConfig;
use ets_core::facts::RegulatedNode;
use ets_core::model::{AllocationType, RegistryId};
use ets_core::store::Store;
use std::path::Path;
use tracing::info;

pub const COLUMNS: usize = 7;

/// Import every data file in `folder`.
pub fn import_folder(
    store: &mut Store,
    config: &RegistryConfig,
    folder: &Path,
) -> Result<StageReport, ImportError> {
    info!("importing compliance data from {}", folder.display());
    let mut report = StageReport::new("compliance");
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

        let id = RegistryId::new(&f[0], &f[1]);
        let period = tx.get_or_create_period(&f[2])?;

        let Some(entity) = tx.resolve_regulated(&id.key()) else {
            report.skip_row(path, row.line, &id.key(), SkipReason::UnresolvedReference);
            continue;
        };

        if let Some(value) = report.parse_numeric(path, row.line, "surrendered_units", &f[5]) {
            entity.set_surrendered_units_for_period(&mut tx, period, value);
        }
        if let Some(value) = report.parse_numeric(path, row.line, "verified_emissions", &f[4]) {
            entity.set_verified_emissions_for_period(&mut tx, period, value);
        }
        if !f[6].is_empty() {
            entity.set_compliance_for_period(&mut tx, period, &f[6]);
        }
        if let Some(value) = report.parse_numeric(path, row.line, "allowances_in_allocation", &f[3])
        {
            entity.set_allowances_in_allocation_for_period(
                &mut tx,
                period,
                value,
                AllocationType::Standard,
            );
        }
        report.rows_processed += 1;

        batch += 1;
        if batch % config.import.fact_batch_rows == 0 {
            tx.commit()?;
            tx = store.begin();
        }
    }
    tx.commit()?;
    Ok(())
}
