//! Shared fixtures: tab-separated source files matching the published
//! column layouts, with only the fields the decoders read filled in.

#![allow(dead_code)]

use ets_core::store::Store;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn open_store() -> (TempDir, Store) {
    let tmp = TempDir::new().unwrap();
    let store = Store::open(&tmp.path().join("db")).unwrap();
    (tmp, store)
}

/// Write a source file: one throwaway header line plus the given rows.
pub fn write_source(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut content = String::from("HEADER\n");
    content.push_str(&rows.join("\n"));
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}

fn join(fields: Vec<(usize, &str)>, width: usize) -> String {
    let mut row = vec![String::new(); width];
    for (i, value) in fields {
        row[i] = value.to_string();
    }
    row.join("\t")
}

/// 27-column installation row.
pub fn installation_row(
    country_name: &str,
    country_id: &str,
    local_id: &str,
    name: &str,
    company: &str,
    main_activity: &str,
) -> String {
    join(
        vec![
            (0, country_name),
            (6, company),
            (11, local_id),
            (12, name),
            (13, "PERMIT-1"),
            (21, "69000"),
            (22, "Lyon"),
            (23, country_id),
            (26, main_activity),
        ],
        27,
    )
}

/// 28-column aircraft-operator row.
pub fn aircraft_operator_row(
    country_name: &str,
    country_id: &str,
    local_id: &str,
    company: &str,
    unique_code: &str,
) -> String {
    join(
        vec![
            (0, country_name),
            (6, company),
            (11, local_id),
            (12, unique_code),
            (19, "ICAO"),
            (24, country_id),
            (27, "10-Aviation"),
        ],
        28,
    )
}

/// 7-column compliance row.
pub fn compliance_row(
    country_id: &str,
    local_id: &str,
    year: &str,
    allowances: &str,
    verified: &str,
    surrendered: &str,
    code: &str,
) -> String {
    [country_id, local_id, year, allowances, verified, surrendered, code].join("\t")
}

/// 4-column allocation row (NER and Article 10c share the layout).
pub fn allocation_row(country_id: &str, local_id: &str, year: &str, value: &str) -> String {
    [country_id, local_id, year, value].join("\t")
}

/// 3-column offset-entitlement row.
pub fn entitlement_row(country_name: &str, local_id: &str, value: &str) -> String {
    [country_name, local_id, value].join("\t")
}

/// 12-column offset transaction row.
pub fn offset_row(
    country_id: &str,
    local_id: &str,
    originating_registry: &str,
    unit_type: &str,
    amount: &str,
    year_of_compliance: &str,
    project_id: &str,
) -> String {
    join(
        vec![
            (0, country_id),
            (1, local_id),
            (2, originating_registry),
            (3, unit_type),
            (4, amount),
            (7, year_of_compliance),
            (9, project_id),
        ],
        12,
    )
}
