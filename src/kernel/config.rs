use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::catalog::{CatalogBuilder, CatalogError, SchemaCatalog};
use super::telemetry::recorder::MAX_EVENTS;
use super::time::POLL_MS;
use super::version::GameVersion;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Host polling cadence for the background poller.
    pub poll_interval_ms: u64,
    /// Ring buffer size of the decode telemetry log.
    pub decode_event_capacity: usize,
    /// Generations whose `SHIELD LEVEL` key is the shield total rather than
    /// hull integrity. Empty means TOTAL is always derived.
    pub native_shield_total: Vec<GameVersion>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_MS,
            decode_event_capacity: MAX_EVENTS,
            native_shield_total: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Standard catalog with this config's overrides applied.
    pub fn catalog(&self) -> Result<SchemaCatalog, ConfigError> {
        let builder = self
            .native_shield_total
            .iter()
            .fold(CatalogBuilder::standard(), |b, v| b.native_total(*v));
        Ok(builder.build()?)
    }
}
