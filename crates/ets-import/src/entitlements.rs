//! Decoders for the offset-entitlement files.
//!
//! 3 positional columns: country name, local entity id, entitlement value.
//! Both files carry the fixed trading-scheme span `2008to2020` rather than
//! per-row years, and identify the country by name — a row whose country
//! has never been seen cannot derive its composite id and is skipped.

use crate::report::{SkipReason, StageReport};
use crate::{ImportError, tsv};
use ets_core::config::RegistryConfig;
use ets_core::facts::{Regulated, RegulatedNode};
use ets_core::model::RegistryId;
use ets_core::store::Store;
use std::path::Path;
use tracing::info;

pub const COLUMNS: usize = 3;

/// The multi-year span all entitlements attach to.
pub const ENTITLEMENT_PERIOD: &str = "2008to2020";

/// Which regulated kind one entitlement file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementTarget {
    Installations,
    AircraftOperators,
}

impl EntitlementTarget {
    fn stage(self) -> &'static str {
        match self {
            EntitlementTarget::Installations => "installation-entitlements",
            EntitlementTarget::AircraftOperators => "aircraft-operator-entitlements",
        }
    }
}

pub fn import_file(
    store: &mut Store,
    config: &RegistryConfig,
    path: &Path,
    target: EntitlementTarget,
) -> Result<StageReport, ImportError> {
    info!("importing file {}", path.display());
    let mut report = StageReport::new(target.stage());
    let rows = match tsv::RowReader::open(path) {
        Ok(rows) => rows,
        Err(e) => {
            report.skip_file(path, &e.to_string());
            return Ok(report);
        }
    };

    let mut tx = store.begin();
    let period = tx.get_or_create_period(ENTITLEMENT_PERIOD)?;
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

        let Some(country) = tx.country_by_name(&f[0]) else {
            report.skip_row(path, row.line, &f[0], SkipReason::UnresolvedReference);
            continue;
        };
        let country_id = country.id(&tx).to_string();
        let id = RegistryId::new(country_id, &f[1]);

        let entity = match target {
            EntitlementTarget::Installations => {
                tx.installation(&id.key()).map(Regulated::Installation)
            }
            EntitlementTarget::AircraftOperators => {
                tx.aircraft_operator(&id.key()).map(Regulated::AircraftOperator)
            }
        };
        let Some(entity) = entity else {
            report.skip_row(path, row.line, &id.key(), SkipReason::UnresolvedReference);
            continue;
        };

        if let Some(value) = report.parse_numeric(path, row.line, "offset_entitlement", &f[2]) {
            entity.set_offset_entitlement_for_period(&mut tx, period, value);
        }
        report.rows_processed += 1;

        batch += 1;
        if batch % config.import.fact_batch_rows == 0 {
            info!("{batch} {} rows added...", target.stage());
            tx.commit()?;
            tx = store.begin();
        }
    }
    tx.commit()?;
    Ok(report)
}
