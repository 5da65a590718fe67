mod common;

use common::{
    aircraft_operator_row, allocation_row, compliance_row, entitlement_row, installation_row,
    offset_row, write_source,
};
use ets_core::config::RegistryConfig;
use ets_core::model::{EdgeKind, NodeKind};
use ets_core::store::Store;
use ets_import::fixes::{CORRECTED_OPERATOR_ID, MISFILED_OPERATOR_ID};
use ets_import::pipeline::{self, ImportPaths};
use std::path::Path;
use tempfile::TempDir;

/// Lay out a complete fixture tree: two installations, two operators (one of
/// them the misfiled Croatian one), compliance, allocations, entitlements,
/// and one offset.
fn write_fixtures(root: &Path) -> ImportPaths {
    write_source(
        &root.join("installations"),
        "installations.csv",
        &[
            installation_row("France", "FR", "1", "Lyon Plant", "Acme Power", "20-Combustion"),
            installation_row("Croatia", "HR", "5", "Zagreb Plant", "", "20-Combustion"),
        ],
    );
    write_source(
        &root.join("operators"),
        "operators.csv",
        &[
            aircraft_operator_row("Germany", "DE", "42", "Luft AG", "UC-42"),
            // Misfiled under Germany; the data correction re-keys it.
            aircraft_operator_row("Germany", "DE", "200696", "Adria Air", "UC-200696"),
        ],
    );
    write_source(
        &root.join("compliance"),
        "compliance.csv",
        &[
            compliance_row("FR", "1", "2012", "5000", "4800", "4700", "A"),
            compliance_row("DE", "42", "2012", "", "900", "", "B"),
            compliance_row("FR", "404", "2012", "1", "1", "1", "A"),
        ],
    );
    write_source(
        root,
        "ner.csv",
        &[allocation_row("FR", "1", "2013", "250")],
    );
    write_source(
        root,
        "article10c.csv",
        &[allocation_row("FR", "1", "2013", "77")],
    );
    write_source(
        root,
        "installation-entitlements.csv",
        &[entitlement_row("France", "1", "12345")],
    );
    write_source(
        root,
        "operator-entitlements.csv",
        &[entitlement_row("Germany", "42", "999")],
    );
    write_source(
        &root.join("offsets"),
        "offsets.csv",
        &[offset_row("FR", "1", "Switzerland", "CER", "1500", "2013", "CDM-77")],
    );

    ImportPaths {
        installations: root.join("installations"),
        aircraft_operators: root.join("operators"),
        compliance: root.join("compliance"),
        ner_allocation: root.join("ner.csv"),
        article10c_allocation: root.join("article10c.csv"),
        installation_entitlements: root.join("installation-entitlements.csv"),
        aircraft_operator_entitlements: root.join("operator-entitlements.csv"),
        offsets: root.join("offsets"),
    }
}

fn kind_counts(store: &Store) -> Vec<(NodeKind, usize)> {
    NodeKind::ALL
        .into_iter()
        .map(|kind| (kind, store.node_count_of(kind)))
        .collect()
}

#[test]
fn test_full_run_builds_converged_graph() {
    let tmp = TempDir::new().unwrap();
    let mut store = Store::open(&tmp.path().join("db")).unwrap();
    let config = RegistryConfig::default();
    let paths = write_fixtures(tmp.path());

    let report = pipeline::run(&mut store, &config, &paths).unwrap();

    assert_eq!(store.node_count_of(NodeKind::Installation), 2);
    assert_eq!(store.node_count_of(NodeKind::AircraftOperator), 2);
    assert_eq!(store.node_count_of(NodeKind::Offset), 1);
    // France, Croatia, Germany, plus the Swiss originating registry.
    assert_eq!(store.node_count_of(NodeKind::Country), 4);

    // The unresolved compliance row was skipped, the rest processed.
    assert_eq!(report.rows_skipped(), 1);
    assert_eq!(report.rows_processed(), 11);

    // Facts landed on both regulated kinds.
    let plant = store.installation("FR1").unwrap();
    assert_eq!(store.out_edges(plant.node(), Some(EdgeKind::Allocation)).count(), 3);
    let operator = store.aircraft_operator("DE42").unwrap();
    assert_eq!(
        store
            .out_edges(operator.node(), Some(EdgeKind::VerifiedEmissions))
            .count(),
        1
    );
    assert_eq!(
        store
            .out_edges(operator.node(), Some(EdgeKind::OffsetEntitlement))
            .count(),
        1
    );
}

#[test]
fn test_data_correction_repoints_misfiled_operator() {
    let tmp = TempDir::new().unwrap();
    let mut store = Store::open(&tmp.path().join("db")).unwrap();
    let config = RegistryConfig::default();
    let paths = write_fixtures(tmp.path());

    pipeline::run(&mut store, &config, &paths).unwrap();

    assert!(store.aircraft_operator(MISFILED_OPERATOR_ID).is_none());
    let operator = store.aircraft_operator(CORRECTED_OPERATOR_ID).unwrap();
    let country = operator.country(&store).unwrap();
    assert_eq!(country.id(&store), "HR");
    assert_eq!(country.name(&store), "Croatia");
}

#[test]
fn test_rerunning_the_pipeline_converges() {
    let tmp = TempDir::new().unwrap();
    let mut store = Store::open(&tmp.path().join("db")).unwrap();
    let config = RegistryConfig::default();
    let paths = write_fixtures(tmp.path());

    pipeline::run(&mut store, &config, &paths).unwrap();
    let nodes_after_first = kind_counts(&store);
    let plant = store.installation("FR1").unwrap();
    let facts_after_first = store.out_edges(plant.node(), None).count();

    pipeline::run(&mut store, &config, &paths).unwrap();

    // Every resolve-then-create path converges: identical entity and fact
    // structure after a second run. Offset transaction records are the one
    // append-only kind, so they are compared separately.
    let nodes_after_second = kind_counts(&store);
    for (&(kind, first), &(_, second)) in nodes_after_first.iter().zip(&nodes_after_second) {
        if kind == NodeKind::Offset {
            continue;
        }
        assert_eq!(first, second, "node count diverged for {kind}");
    }
    assert_eq!(store.out_edges(plant.node(), None).count(), facts_after_first);

    // The re-keyed operator stays put: the correction is a no-op when the
    // misfiled id is no longer present.
    assert!(store.aircraft_operator(MISFILED_OPERATOR_ID).is_none());
    assert!(store.aircraft_operator(CORRECTED_OPERATOR_ID).is_some());
}

#[test]
fn test_run_survives_missing_sources() {
    let tmp = TempDir::new().unwrap();
    let mut store = Store::open(&tmp.path().join("db")).unwrap();
    let config = RegistryConfig::default();

    // Nothing on disk at all: every stage records its missing input and the
    // run still completes with an empty graph.
    let paths = ImportPaths {
        installations: tmp.path().join("missing-installations"),
        aircraft_operators: tmp.path().join("missing-operators"),
        compliance: tmp.path().join("missing-compliance"),
        ner_allocation: tmp.path().join("missing-ner.csv"),
        article10c_allocation: tmp.path().join("missing-article10c.csv"),
        installation_entitlements: tmp.path().join("missing-ie.csv"),
        aircraft_operator_entitlements: tmp.path().join("missing-oe.csv"),
        offsets: tmp.path().join("missing-offsets"),
    };
    let report = pipeline::run(&mut store, &config, &paths).unwrap();

    assert_eq!(report.rows_processed(), 0);
    assert_eq!(report.files_skipped(), 8);
    assert_eq!(store.node_count(), 0);
}
