//! Per-run import report.
//!
//! Every recoverable condition a decoder swallows lands here: skipped rows
//! with their reason, numeric fields dropped on parse failure, and files or
//! folders that could not be read. The CLI prints the aggregate after the
//! run; nothing recoverable is reported only to the console.

use std::fmt;
use std::path::Path;

/// Why a row was skipped in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row names an entity id absent from the graph. Never retried.
    UnresolvedReference,
    /// Wrong number of tab-separated columns.
    ColumnCount { expected: usize, found: usize },
    /// A field the decoder cannot proceed without is empty.
    MissingMandatoryFields,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnresolvedReference => f.write_str("unresolved reference"),
            SkipReason::ColumnCount { expected, found } => {
                write!(f, "expected {expected} columns, found {found}")
            }
            SkipReason::MissingMandatoryFields => f.write_str("missing mandatory fields"),
        }
    }
}

/// A row skipped in full.
#[derive(Debug, Clone)]
pub struct RowSkip {
    pub file: String,
    pub line: usize,
    /// The key the row was about, when one could be derived.
    pub subject: String,
    pub reason: SkipReason,
}

/// A single numeric fact dropped from an otherwise processed row.
#[derive(Debug, Clone)]
pub struct DroppedFact {
    pub file: String,
    pub line: usize,
    pub field: &'static str,
    pub raw: String,
}

/// Outcome of one pipeline stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: &'static str,
    pub rows_processed: usize,
    pub skipped: Vec<RowSkip>,
    pub dropped_facts: Vec<DroppedFact>,
    pub files_skipped: Vec<String>,
}

impl StageReport {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            rows_processed: 0,
            skipped: Vec::new(),
            dropped_facts: Vec::new(),
            files_skipped: Vec::new(),
        }
    }

    /// Record a fully skipped row.
    pub fn skip_row(&mut self, file: &Path, line: usize, subject: &str, reason: SkipReason) {
        tracing::warn!(
            "{}:{line}: skipping row [{subject}]: {reason}",
            file.display()
        );
        self.skipped.push(RowSkip {
            file: file.display().to_string(),
            line,
            subject: subject.to_string(),
            reason,
        });
    }

    /// Record a skipped file or folder.
    pub fn skip_file(&mut self, file: &Path, why: &str) {
        tracing::warn!("skipping {}: {why}", file.display());
        self.files_skipped.push(file.display().to_string());
    }

    /// Parse a numeric field. `None` for an empty field (nothing to store)
    /// and for a malformed one; only the latter is recorded as a dropped
    /// fact — the row itself continues.
    pub fn parse_numeric(
        &mut self,
        file: &Path,
        line: usize,
        field: &'static str,
        raw: &str,
    ) -> Option<f64> {
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(
                    "{}:{line}: {field} value {raw:?} is not a number, it won't be stored",
                    file.display()
                );
                self.dropped_facts.push(DroppedFact {
                    file: file.display().to_string(),
                    line,
                    field,
                    raw: raw.to_string(),
                });
                None
            }
        }
    }
}

/// Consolidated outcome of a whole pipeline run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub stages: Vec<StageReport>,
}

impl ImportReport {
    pub fn rows_processed(&self) -> usize {
        self.stages.iter().map(|s| s.rows_processed).sum()
    }

    pub fn rows_skipped(&self) -> usize {
        self.stages.iter().map(|s| s.skipped.len()).sum()
    }

    pub fn facts_dropped(&self) -> usize {
        self.stages.iter().map(|s| s.dropped_facts.len()).sum()
    }

    pub fn files_skipped(&self) -> usize {
        self.stages.iter().map(|s| s.files_skipped.len()).sum()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import finished:")?;
        for stage in &self.stages {
            writeln!(
                f,
                "  {:<32} {:>8} rows, {} skipped, {} facts dropped",
                stage.stage,
                stage.rows_processed,
                stage.skipped.len(),
                stage.dropped_facts.len()
            )?;
        }
        write!(
            f,
            "  total: {} rows processed, {} rows skipped, {} facts dropped, {} files skipped",
            self.rows_processed(),
            self.rows_skipped(),
            self.facts_dropped(),
            self.files_skipped()
        )
    }
}
