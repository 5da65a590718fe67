//! Decoders for the NER and Article-10c allocation files.
//!
//! Both share one 4-column layout: country code, local installation id,
//! year, allocated value. Only the allocation subtype differs. The period
//! is created even when the value column is empty or unparseable — the
//! time axis converges across files regardless of which facts survive.

use crate::report::{SkipReason, StageReport};
use crate::{ImportError, tsv};
use ets_core::config::RegistryConfig;
use ets_core::facts::RegulatedNode;
use ets_core::model::{AllocationType, RegistryId};
use ets_core::store::Store;
use std::path::Path;
use tracing::info;

pub const COLUMNS: usize = 4;

/// Import the new-entrants-reserve allocation file.
pub fn import_ner_file(
    store: &mut Store,
    config: &RegistryConfig,
    path: &Path,
) -> Result<StageReport, ImportError> {
    import_allocation_file(store, config, path, AllocationType::Ner, "ner-allocation")
}

/// Import the Article-10c (power-sector transitional) allocation file.
pub fn import_article10c_file(
    store: &mut Store,
    config: &RegistryConfig,
    path: &Path,
) -> Result<StageReport, ImportError> {
    import_allocation_file(
        store,
        config,
        path,
        AllocationType::Article10c,
        "article10c-allocation",
    )
}

fn import_allocation_file(
    store: &mut Store,
    config: &RegistryConfig,
    path: &Path,
    allocation_type: AllocationType,
    stage: &'static str,
) -> Result<StageReport, ImportError> {
    info!("importing file {}", path.display());
    let mut report = StageReport::new(stage);
    let rows = match tsv::RowReader::open(path) {
        Ok(rows) => rows,
        Err(e) => {
            report.skip_file(path, &e.to_string());
            return Ok(report);
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

        // Allocation files only ever name installations.
        let Some(installation) = tx.installation(&id.key()) else {
            report.skip_row(path, row.line, &id.key(), SkipReason::UnresolvedReference);
            continue;
        };

        if let Some(value) = report.parse_numeric(path, row.line, "allowances_in_allocation", &f[3])
        {
            installation.set_allowances_in_allocation_for_period(
                &mut tx,
                period,
                value,
                allocation_type,
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
    Ok(report)
}
