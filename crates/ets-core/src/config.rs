//! Registry configuration.
//!
//! Load order: `<db>/config.toml` → environment variables → defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level registry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub import: ImportConfig,
}

/// Batch-commit sizes for the import pipeline and classification pass.
///
/// Commits bound the uncommitted work lost on abnormal termination and keep
/// per-transaction memory bounded; the run as a whole is deliberately
/// non-atomic. Entity files commit less often than fact files because their
/// rows are cheaper to redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Rows per commit for entity source files (installations, operators).
    pub entity_batch_rows: usize,
    /// Rows per commit for fact source files (compliance, allocations,
    /// entitlements, offsets).
    pub fact_batch_rows: usize,
    /// Installations per commit during the classification pass.
    pub classify_batch_rows: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            entity_batch_rows: 1000,
            fact_batch_rows: 100,
            classify_batch_rows: 100,
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl RegistryConfig {
    /// Load config from `config.toml` in the store directory, with env var
    /// overrides. Falls back to defaults if no config file exists.
    pub fn load(db_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = db_dir.join("config.toml");

        let mut config: RegistryConfig = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("ETS_ENTITY_BATCH_ROWS", &mut config.import.entity_batch_rows);
        env_override("ETS_FACT_BATCH_ROWS", &mut config.import.fact_batch_rows);
        env_override(
            "ETS_CLASSIFY_BATCH_ROWS",
            &mut config.import.classify_batch_rows,
        );

        if config.import.entity_batch_rows == 0
            || config.import.fact_batch_rows == 0
            || config.import.classify_batch_rows == 0
        {
            return Err(ConfigError::Invalid(
                "batch sizes must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }
}
