//! Snapshot serialization and version handling.

use crate::store::{Snapshot, StoreError};

pub const CURRENT_VERSION: &str = "1.1.0";

/// Validate a snapshot's schema version.
pub fn validate_version(snapshot: &Snapshot) -> Result<(), StoreError> {
    if snapshot.version != CURRENT_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: CURRENT_VERSION.to_string(),
            found: snapshot.version.clone(),
        });
    }
    Ok(())
}

/// Serialize a snapshot to JSON.
pub fn to_json(snapshot: &Snapshot) -> Result<String, StoreError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Deserialize a snapshot from JSON, rejecting version mismatches.
pub fn from_json(json: &str) -> Result<Snapshot, StoreError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    validate_version(&snapshot)?;
    Ok(snapshot)
}
