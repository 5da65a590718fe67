//! One-off data corrections.
//!
//! The registry data is imported as published; the single exception is the
//! aircraft operator filed under Germany with a Croatian local id. After
//! the operator import it is re-keyed and re-pointed to Croatia. This is
//! the only place the graph is corrected rather than merged.

use crate::ImportError;
use ets_core::facts::RegulatedNode;
use ets_core::store::Store;
use tracing::{info, warn};

pub const MISFILED_OPERATOR_ID: &str = "DE200696";
pub const CORRECTED_OPERATOR_ID: &str = "HR200696";
const CORRECT_COUNTRY_ID: &str = "HR";

/// Re-point the misfiled operator to Croatia and rewrite its composite id.
/// Returns whether a correction was applied; a graph without the operator
/// (or without Croatia) is left untouched.
pub fn repoint_misfiled_aircraft_operator(store: &mut Store) -> Result<bool, ImportError> {
    let mut tx = store.begin();

    let Some(operator) = tx.aircraft_operator(MISFILED_OPERATOR_ID) else {
        info!("operator {MISFILED_OPERATOR_ID} not present, nothing to fix");
        return Ok(false);
    };
    let Some(croatia) = tx.country_by_id(CORRECT_COUNTRY_ID) else {
        warn!("country {CORRECT_COUNTRY_ID} not present, leaving {MISFILED_OPERATOR_ID} as-is");
        return Ok(false);
    };

    info!("re-pointing aircraft operator {MISFILED_OPERATOR_ID} to {CORRECTED_OPERATOR_ID}");
    operator.set_country(&mut tx, croatia);
    operator.set_id(&mut tx, CORRECTED_OPERATOR_ID)?;
    tx.commit()?;
    Ok(true)
}
