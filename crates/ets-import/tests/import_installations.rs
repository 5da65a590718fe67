mod common;

use common::{installation_row, open_store, write_source};
use ets_core::config::RegistryConfig;
use ets_core::model::NodeKind;
use ets_import::installations;
use ets_import::report::{SkipReason, StageReport};

#[test]
fn test_installation_row_creates_entities_and_associations() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    let path = write_source(
        tmp.path(),
        "installations.csv",
        &[installation_row(
            "France",
            "FR",
            "1001",
            "Lyon Plant",
            "Acme Power",
            "20-Combustion of fuels",
        )],
    );

    let mut report = StageReport::new("installations");
    installations::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(report.rows_processed, 1);
    let plant = store.installation("FR1001").unwrap();
    assert_eq!(plant.name(&store), "Lyon Plant");
    assert_eq!(plant.city(&store), "Lyon");
    assert_eq!(plant.post_code(&store), "69000");
    assert_eq!(plant.permit_id(&store), "PERMIT-1");
    assert!(!plant.power_flag(&store));

    let country = plant.country(&store).unwrap();
    assert_eq!(country.name(&store), "France");
    assert_eq!(country.id(&store), "FR");

    let company = plant.company(&store).unwrap();
    assert_eq!(company.name(&store), "Acme Power");

    let sector = plant.sector(&store).unwrap();
    assert_eq!(sector.id(&store), "20");
    assert_eq!(sector.name(&store), "Combustion of fuels");
}

#[test]
fn test_sector_name_keeps_embedded_hyphens() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    let path = write_source(
        tmp.path(),
        "installations.csv",
        &[installation_row(
            "France",
            "FR",
            "1",
            "Plant",
            "",
            "99-Production of coke-oven products",
        )],
    );

    let mut report = StageReport::new("installations");
    installations::import_file(&mut store, &config, &path, &mut report).unwrap();

    let sector = store.sector_by_id("99").unwrap();
    assert_eq!(sector.name(&store), "Production of coke-oven products");
}

#[test]
fn test_row_without_company_name_creates_no_company() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    let path = write_source(
        tmp.path(),
        "installations.csv",
        &[installation_row("France", "FR", "1", "Plant", "", "20-Combustion")],
    );

    let mut report = StageReport::new("installations");
    installations::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(store.node_count_of(NodeKind::Company), 0);
    assert!(store.installation("FR1").unwrap().company(&store).is_none());
}

#[test]
fn test_shared_company_resolves_to_one_node() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    let path = write_source(
        tmp.path(),
        "installations.csv",
        &[
            installation_row("France", "FR", "1", "Plant A", "Acme Power", "20-Combustion"),
            installation_row("France", "FR", "2", "Plant B", "Acme Power", "20-Combustion"),
        ],
    );

    let mut report = StageReport::new("installations");
    installations::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(report.rows_processed, 2);
    assert_eq!(store.node_count_of(NodeKind::Company), 1);
    assert_eq!(store.node_count_of(NodeKind::Country), 1);
    assert_eq!(store.node_count_of(NodeKind::Sector), 1);
    assert_eq!(store.node_count_of(NodeKind::Installation), 2);
}

#[test]
fn test_malformed_row_is_skipped_and_rest_proceeds() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    let path = write_source(
        tmp.path(),
        "installations.csv",
        &[
            "too\tfew\tcolumns".to_string(),
            installation_row("France", "FR", "1", "Plant", "", "20-Combustion"),
        ],
    );

    let mut report = StageReport::new("installations");
    installations::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(report.rows_processed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::ColumnCount {
            expected: 27,
            found: 3
        }
    );
    assert!(store.installation("FR1").is_some());
}

#[test]
fn test_reimport_keeps_first_writer_attributes() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    let path = write_source(
        tmp.path(),
        "installations.csv",
        &[installation_row("France", "FR", "1", "Original Name", "", "20-Combustion")],
    );
    let renamed = write_source(
        tmp.path(),
        "installations2.csv",
        &[installation_row("France", "FR", "1", "Renamed", "", "20-Combustion")],
    );

    let mut report = StageReport::new("installations");
    installations::import_file(&mut store, &config, &path, &mut report).unwrap();
    installations::import_file(&mut store, &config, &renamed, &mut report).unwrap();

    assert_eq!(store.node_count_of(NodeKind::Installation), 1);
    let plant = store.installation("FR1").unwrap();
    assert_eq!(plant.name(&store), "Original Name");
}

#[test]
fn test_non_directory_folder_is_recorded_and_skipped() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();

    let report =
        installations::import_folder(&mut store, &config, &tmp.path().join("missing")).unwrap();

    assert_eq!(report.rows_processed, 0);
    assert_eq!(report.files_skipped.len(), 1);
}

#[test]
fn test_folder_import_only_reads_data_extensions() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    let folder = tmp.path().join("inst");
    write_source(
        &folder,
        "a.csv",
        &[installation_row("France", "FR", "1", "Plant", "", "20-Combustion")],
    );
    write_source(&folder, "notes.txt", &["not a data file".to_string()]);

    let report = installations::import_folder(&mut store, &config, &folder).unwrap();

    assert_eq!(report.rows_processed, 1);
    assert_eq!(report.skipped.len(), 0);
}
