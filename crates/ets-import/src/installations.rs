//! Decoder for installation extracts.
//!
//! 27 positional columns per row. Each row resolves or creates its Country
//! (by name), Company (by name, when named), and Sector (from the
//! `id-name` main-activity column), then resolves or creates the
//! Installation itself under its composite registry id. Attributes of an
//! already-seen installation are left untouched.

use crate::report::{SkipReason, StageReport};
use crate::{ImportError, tsv};
use ets_core::config::RegistryConfig;
use ets_core::model::RegistryId;
use ets_core::registry::{CompanySeed, InstallationSeed};
use ets_core::store::Store;
use std::path::Path;
use tracing::info;

pub const COLUMNS: usize = 27;

/// Split a `id-name` main-activity token. Names may themselves contain
/// hyphens; only the first one separates the id.
pub(crate) fn split_main_activity(token: &str) -> Option<(&str, &str)> {
    token.split_once('-').map(|(id, name)| (id.trim(), name.trim()))
}

/// Build the company seed shared by the installation and aircraft-operator
/// layouts (columns 3–10 and 16–17 hold the same fields in both).
pub(crate) fn company_seed(fields: &[String]) -> CompanySeed {
    CompanySeed {
        name: fields[6].clone(),
        registration_number: fields[3].clone(),
        postal_code: fields[9].clone(),
        city: fields[10].clone(),
        address: format!("{}\n{}", fields[7], fields[8]),
        status: fields[4].clone(),
        subsidiary_of: fields[16].clone(),
        parent_of: fields[17].clone(),
    }
}

/// Import every data file in `folder`.
pub fn import_folder(
    store: &mut Store,
    config: &RegistryConfig,
    folder: &Path,
) -> Result<StageReport, ImportError> {
    info!("importing installations from {}", folder.display());
    let mut report = StageReport::new("installations");
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

        let country = tx.get_or_create_country(&f[0], &f[23])?;
        let company = tx.get_or_create_company(&company_seed(f))?;
        let sector = match split_main_activity(&f[26]) {
            Some((id, name)) => tx.get_or_create_sector(id, name)?,
            None => None,
        };

        let seed = InstallationSeed {
            id: RegistryId::new(&f[23], &f[11]),
            name: f[12].clone(),
            city: f[22].clone(),
            post_code: f[21].clone(),
            address: format!("{} {}", f[19], f[20]),
            eprtr_id: f[18].clone(),
            permit_id: f[13].clone(),
            permit_entry_date: f[14].clone(),
            permit_expiry_or_revocation_date: f[15].clone(),
            latitude: f[24].clone(),
            longitude: f[25].clone(),
        };
        tx.get_or_create_installation(&seed, Some(country), company, sector)?;
        report.rows_processed += 1;

        batch += 1;
        if batch % config.import.entity_batch_rows == 0 {
            info!("{batch} installation rows imported...");
            tx.commit()?;
            tx = store.begin();
        }
    }
    tx.commit()?;
    Ok(())
}
