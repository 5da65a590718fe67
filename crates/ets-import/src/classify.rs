//! Power-flag classification pass.
//!
//! Runs after all imports. Every installation is recomputed from scratch:
//! a NACE code in the power-sector set flags it with reason `NACE`; failing
//! that, any Article-10c allocation fact flags it with reason `Article10c`;
//! otherwise the flag is cleared. The NACE rule short-circuits the
//! Article-10c check. Re-running the pass is idempotent by construction.

use crate::ImportError;
use ets_core::config::RegistryConfig;
use ets_core::facts::RegulatedNode;
use ets_core::model::{AllocationType, NodeKind};
use ets_core::nodes::Installation;
use ets_core::store::{NodeId, Store};
use std::collections::HashSet;
use tracing::info;

/// NACE codes marking an installation as power-sector.
pub const POWER_FLAG_NACE_CODES: [&str; 7] =
    ["35.00", "35.10", "35.11", "35.12", "35.13", "35.14", "35.30"];

pub const REASON_NACE: &str = "NACE";
pub const REASON_ARTICLE10C: &str = "Article10c";

/// Outcome of one classification run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassifyReport {
    pub installations_scanned: usize,
    pub flagged_nace: usize,
    pub flagged_article10c: usize,
}

/// Classify every installation, committing in batches like the importers.
pub fn run(store: &mut Store, config: &RegistryConfig) -> Result<ClassifyReport, ImportError> {
    let power_codes: HashSet<&str> = POWER_FLAG_NACE_CODES.into_iter().collect();
    let installations: Vec<NodeId> = store.nodes_of_kind(NodeKind::Installation).collect();
    info!("classifying {} installations...", installations.len());

    let mut report = ClassifyReport::default();
    let mut tx = store.begin();
    for node in installations {
        let installation = Installation::from_node(&tx, node)?;

        let nace_id = installation
            .nace_code(&tx)
            .map(|nace| nace.id(&tx).to_string());
        if nace_id.is_some_and(|id| power_codes.contains(id.as_str())) {
            installation.set_power_flag(&mut tx, true, REASON_NACE)?;
            report.flagged_nace += 1;
        } else if !installation
            .allocations_of_type(&tx, AllocationType::Article10c)
            .is_empty()
        {
            installation.set_power_flag(&mut tx, true, REASON_ARTICLE10C)?;
            report.flagged_article10c += 1;
        } else {
            installation.set_power_flag(&mut tx, false, "")?;
        }

        report.installations_scanned += 1;
        if report.installations_scanned % config.import.classify_batch_rows == 0 {
            info!("{} installations analyzed so far...", report.installations_scanned);
            tx.commit()?;
            tx = store.begin();
        }
    }
    tx.commit()?;

    info!(
        "classification complete: {} scanned, {} flagged by NACE, {} by Article 10c",
        report.installations_scanned, report.flagged_nace, report.flagged_article10c
    );
    Ok(report)
}
