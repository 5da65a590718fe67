//! Decoder for emission-offset transaction extracts.
//!
//! 12 positional columns. Every surviving row creates a fresh Offset node —
//! offsets carry no natural key and are never resolved. Rows must name a
//! compliance year, an originating registry, and a local entity id; the
//! originating registry is resolved by name and may be created with an
//! empty registry code when first seen here.

use crate::report::{SkipReason, StageReport};
use crate::{ImportError, tsv};
use ets_core::config::RegistryConfig;
use ets_core::facts::link_offset;
use ets_core::model::{OffsetUnitType, RegistryId};
use ets_core::store::Store;
use std::path::Path;
use tracing::info;

pub const COLUMNS: usize = 12;

/// Import every data file in `folder`.
pub fn import_folder(
    store: &mut Store,
    config: &RegistryConfig,
    folder: &Path,
) -> Result<StageReport, ImportError> {
    info!("importing offsets from {}", folder.display());
    let mut report = StageReport::new("offsets");
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
        let originating_registry = &f[2];
        let unit_type = &f[3];
        let amount = &f[4];
        let year_of_compliance = &f[7];
        let project_id = &f[9];

        if year_of_compliance.is_empty() || originating_registry.is_empty() || f[1].is_empty() {
            report.skip_row(path, row.line, &id.key(), SkipReason::MissingMandatoryFields);
            continue;
        }

        let period = tx.get_or_create_period(year_of_compliance)?;
        let origin = tx.get_or_create_country(originating_registry, "")?;
        let project = tx.get_or_create_project(project_id)?;

        let Some(entity) = tx.resolve_regulated(&id.key()) else {
            report.skip_row(path, row.line, &id.key(), SkipReason::UnresolvedReference);
            continue;
        };

        if let Some(amount) = report.parse_numeric(path, row.line, "offset_amount", amount) {
            let offset = tx.create_offset(amount, &OffsetUnitType::from_token(unit_type))?;
            link_offset(&mut tx, offset, entity, period, project, origin);
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
