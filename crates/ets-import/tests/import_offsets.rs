mod common;

use common::{
    aircraft_operator_row, installation_row, offset_row, open_store, write_source,
};
use ets_core::config::RegistryConfig;
use ets_core::model::{EdgeKind, NodeKind, OffsetUnitType};
use ets_core::nodes::Offset;
use ets_import::report::{SkipReason, StageReport};
use ets_import::{aircraft_operators, installations, offsets};

fn import_plant(store: &mut ets_core::store::Store, tmp: &std::path::Path) {
    let config = RegistryConfig::default();
    let inst = write_source(
        tmp,
        "installations.csv",
        &[installation_row("France", "FR", "1", "Plant", "", "20-Combustion")],
    );
    let mut report = StageReport::new("installations");
    installations::import_file(store, &config, &inst, &mut report).unwrap();
}

fn single_offset(store: &ets_core::store::Store) -> Offset {
    let node = store.nodes_of_kind(NodeKind::Offset).next().unwrap();
    Offset::from_node(store, node).unwrap()
}

#[test]
fn test_offset_row_creates_fully_linked_record() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    import_plant(&mut store, tmp.path());

    let path = write_source(
        tmp.path(),
        "offsets.csv",
        &[offset_row("FR", "1", "Switzerland", "CER - issued", "1500", "2013", "CDM-77")],
    );
    let mut report = StageReport::new("offsets");
    offsets::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(report.rows_processed, 1);
    assert_eq!(store.node_count_of(NodeKind::Offset), 1);

    let offset = single_offset(&store);
    assert_eq!(offset.amount(&store), 1500.0);
    assert_eq!(offset.unit_type(&store), OffsetUnitType::Cer);

    let plant = store.installation("FR1").unwrap();
    let target = store
        .out_edges(offset.node(), Some(EdgeKind::OffsetFor))
        .next()
        .unwrap()
        .1
        .target;
    assert_eq!(target, plant.node());

    assert!(store.period("2013").is_some());
    assert!(store.project_by_id("CDM-77").is_some());
    // The originating registry is created by name with an empty id.
    let origin = store.country_by_name("Switzerland").unwrap();
    assert_eq!(origin.id(&store), "");
    assert_eq!(
        store
            .out_edges(offset.node(), Some(EdgeKind::OriginatingCountry))
            .next()
            .unwrap()
            .1
            .target,
        origin.node()
    );
}

#[test]
fn test_offset_without_project_id_has_no_project() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    import_plant(&mut store, tmp.path());

    let path = write_source(
        tmp.path(),
        "offsets.csv",
        &[offset_row("FR", "1", "Norway", "ERU", "10", "2012", "")],
    );
    let mut report = StageReport::new("offsets");
    offsets::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(store.node_count_of(NodeKind::Project), 0);
    let offset = single_offset(&store);
    assert_eq!(offset.unit_type(&store), OffsetUnitType::Eru);
    assert_eq!(
        store.out_edges(offset.node(), Some(EdgeKind::FromProject)).count(),
        0
    );
}

#[test]
fn test_missing_mandatory_fields_skip_row_before_any_creation() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    import_plant(&mut store, tmp.path());

    let path = write_source(
        tmp.path(),
        "offsets.csv",
        &[
            // No year of compliance.
            offset_row("FR", "1", "Norway", "CER", "10", "", ""),
            // No originating registry.
            offset_row("FR", "1", "", "CER", "10", "2012", ""),
        ],
    );
    let mut report = StageReport::new("offsets");
    offsets::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(report.rows_processed, 0);
    assert_eq!(report.skipped.len(), 2);
    assert!(report
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::MissingMandatoryFields));
    assert_eq!(store.node_count_of(NodeKind::Offset), 0);
    assert!(store.period("2012").is_none());
    assert!(store.country_by_name("Norway").is_none());
}

#[test]
fn test_unparseable_amount_drops_the_offset() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();
    import_plant(&mut store, tmp.path());

    let path = write_source(
        tmp.path(),
        "offsets.csv",
        &[offset_row("FR", "1", "Norway", "CER", "1.5e", "2012", "")],
    );
    let mut report = StageReport::new("offsets");
    offsets::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(report.dropped_facts.len(), 1);
    assert_eq!(store.node_count_of(NodeKind::Offset), 0);
    // Context entities were still resolved/created for the row.
    assert!(store.period("2012").is_some());
    assert!(store.country_by_name("Norway").is_some());
}

#[test]
fn test_offset_falls_back_to_aircraft_operator() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();

    let ops = write_source(
        tmp.path(),
        "operators.csv",
        &[aircraft_operator_row("Germany", "DE", "8", "Luft AG", "UC-8")],
    );
    let mut report = StageReport::new("aircraft-operators");
    aircraft_operators::import_file(&mut store, &config, &ops, &mut report).unwrap();

    let path = write_source(
        tmp.path(),
        "offsets.csv",
        &[offset_row("DE", "8", "Japan", "AAU", "42", "2013", "")],
    );
    let mut report = StageReport::new("offsets");
    offsets::import_file(&mut store, &config, &path, &mut report).unwrap();

    let operator = store.aircraft_operator("DE8").unwrap();
    let offset = single_offset(&store);
    assert_eq!(offset.unit_type(&store), OffsetUnitType::Aau);
    assert_eq!(
        store
            .out_edges(offset.node(), Some(EdgeKind::OffsetFor))
            .next()
            .unwrap()
            .1
            .target,
        operator.node()
    );
}

#[test]
fn test_unknown_entity_skips_row() {
    let (tmp, mut store) = open_store();
    let config = RegistryConfig::default();

    let path = write_source(
        tmp.path(),
        "offsets.csv",
        &[offset_row("FR", "404", "Norway", "CER", "10", "2012", "")],
    );
    let mut report = StageReport::new("offsets");
    offsets::import_file(&mut store, &config, &path, &mut report).unwrap();

    assert_eq!(report.rows_processed, 0);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::UnresolvedReference);
    assert_eq!(store.node_count_of(NodeKind::Offset), 0);
}
