mod common;

use common::open_store;
use ets_core::config::RegistryConfig;
use ets_core::facts::RegulatedNode;
use ets_core::model::{AllocationType, RegistryId};
use ets_core::nodes::Installation;
use ets_core::registry::InstallationSeed;
use ets_core::store::Store;
use ets_import::classify::{self, REASON_ARTICLE10C, REASON_NACE};

fn seed(local: &str) -> InstallationSeed {
    InstallationSeed {
        id: RegistryId::new("FR", local),
        name: format!("Plant {local}"),
        city: String::new(),
        post_code: String::new(),
        address: String::new(),
        eprtr_id: String::new(),
        permit_id: String::new(),
        permit_entry_date: String::new(),
        permit_expiry_or_revocation_date: String::new(),
        latitude: String::new(),
        longitude: String::new(),
    }
}

fn add_installation(store: &mut Store, local: &str, nace: Option<&str>, article10c: bool) {
    let mut tx = store.begin();
    let plant = tx
        .get_or_create_installation(&seed(local), None, None, None)
        .unwrap();
    if let Some(nace_id) = nace {
        let nace = tx.get_or_create_nace_code(nace_id, "").unwrap().unwrap();
        plant.set_nace_code(&mut tx, nace);
    }
    if article10c {
        let period = tx.get_or_create_period("2013").unwrap();
        plant.set_allowances_in_allocation_for_period(
            &mut tx,
            period,
            100.0,
            AllocationType::Article10c,
        );
    }
    tx.commit().unwrap();
}

fn plant(store: &Store, local: &str) -> Installation {
    store.installation(&format!("FR{local}")).unwrap()
}

#[test]
fn test_power_nace_code_flags_installation() {
    let (_tmp, mut store) = open_store();
    add_installation(&mut store, "1", Some("35.11"), false);

    let report = classify::run(&mut store, &RegistryConfig::default()).unwrap();

    assert_eq!(report.installations_scanned, 1);
    assert_eq!(report.flagged_nace, 1);
    assert_eq!(report.flagged_article10c, 0);
    let plant = plant(&store, "1");
    assert!(plant.power_flag(&store));
    assert_eq!(plant.power_flag_reason(&store), REASON_NACE);
}

#[test]
fn test_article10c_allocation_flags_installation() {
    let (_tmp, mut store) = open_store();
    add_installation(&mut store, "1", Some("20.11"), true);

    let report = classify::run(&mut store, &RegistryConfig::default()).unwrap();

    assert_eq!(report.flagged_nace, 0);
    assert_eq!(report.flagged_article10c, 1);
    let plant = plant(&store, "1");
    assert!(plant.power_flag(&store));
    assert_eq!(plant.power_flag_reason(&store), REASON_ARTICLE10C);
}

#[test]
fn test_unflagged_installation_gets_false_and_empty_reason() {
    let (_tmp, mut store) = open_store();
    add_installation(&mut store, "1", Some("20.11"), false);
    add_installation(&mut store, "2", None, false);

    let report = classify::run(&mut store, &RegistryConfig::default()).unwrap();

    assert_eq!(report.installations_scanned, 2);
    assert_eq!(report.flagged_nace + report.flagged_article10c, 0);
    for local in ["1", "2"] {
        let plant = plant(&store, local);
        assert!(!plant.power_flag(&store));
        assert_eq!(plant.power_flag_reason(&store), "");
    }
}

#[test]
fn test_nace_rule_short_circuits_article10c() {
    let (_tmp, mut store) = open_store();
    add_installation(&mut store, "1", Some("35.30"), true);

    let report = classify::run(&mut store, &RegistryConfig::default()).unwrap();

    assert_eq!(report.flagged_nace, 1);
    assert_eq!(report.flagged_article10c, 0);
    assert_eq!(plant(&store, "1").power_flag_reason(&store), REASON_NACE);
}

#[test]
fn test_rerun_recomputes_from_scratch() {
    let (_tmp, mut store) = open_store();
    add_installation(&mut store, "1", Some("35.11"), false);

    classify::run(&mut store, &RegistryConfig::default()).unwrap();
    assert!(plant(&store, "1").power_flag(&store));

    // Re-point the NACE association to a non-power code: the next run must
    // clear the flag rather than merge with the previous result.
    {
        let mut tx = store.begin();
        let plant = tx.installation("FR1").unwrap();
        let other = tx.get_or_create_nace_code("10.20", "").unwrap().unwrap();
        plant.set_nace_code(&mut tx, other);
        tx.commit().unwrap();
    }

    let report = classify::run(&mut store, &RegistryConfig::default()).unwrap();
    assert_eq!(report.flagged_nace, 0);
    assert!(!plant(&store, "1").power_flag(&store));
    assert_eq!(plant(&store, "1").power_flag_reason(&store), "");
}

#[test]
fn test_run_is_idempotent() {
    let (_tmp, mut store) = open_store();
    add_installation(&mut store, "1", Some("35.11"), false);
    add_installation(&mut store, "2", None, true);
    add_installation(&mut store, "3", None, false);

    let first = classify::run(&mut store, &RegistryConfig::default()).unwrap();
    let second = classify::run(&mut store, &RegistryConfig::default()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.installations_scanned, 3);
    assert_eq!(first.flagged_nace, 1);
    assert_eq!(first.flagged_article10c, 1);
}
