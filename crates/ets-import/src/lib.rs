//! Batch import pipeline for the emissions-trading registry.
//!
//! One decoder per source format ([`installations`], [`aircraft_operators`],
//! [`compliance`], [`allocations`], [`entitlements`], [`offsets`]), the
//! fixed-order orchestration ([`pipeline`]), the per-run report
//! ([`report`]), the documented one-off data correction ([`fixes`]), and the
//! power-flag classification pass ([`classify`]).
//!
//! Decoders favor forward progress over strict completeness: a bad numeric
//! field drops one fact, a bad row is skipped, a bad file is skipped, and
//! only a failed commit (or an unopenable store) aborts a run.

pub mod aircraft_operators;
pub mod allocations;
pub mod classify;
pub mod compliance;
pub mod entitlements;
pub mod fixes;
pub mod installations;
pub mod offsets;
pub mod pipeline;
pub mod report;
pub mod tsv;

pub use report::{ImportReport, StageReport};

/// Errors that abort an import run. Everything else is recorded in the
/// report and skipped.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Store(#[from] ets_core::store::StoreError),
}
