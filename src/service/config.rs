use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::{core::Rgb8, error::ChartError, error::ChartResult},
    service::limits::Limits,
};

/// Service configuration, loadable from JSON. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChartographerConfig {
    /// Root of persistent state. Metadata lives in `database/`, blobs in `fragments/`.
    pub data_dir: PathBuf,
    /// Fill color for rendered pixels no fragment covers.
    pub background: Rgb8,
    /// Request-boundary size limits.
    pub limits: Limits,
}

impl Default for ChartographerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            background: Rgb8::BLACK,
            limits: Limits::default(),
        }
    }
}

impl ChartographerConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(s: &str) -> ChartResult<Self> {
        serde_json::from_str(s).map_err(|e| ChartError::serde(format!("invalid config: {e}")))
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> ChartResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Directory holding the metadata database.
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join("database")
    }

    /// Directory holding fragment blobs.
    pub fn fragments_dir(&self) -> PathBuf {
        self.data_dir.join("fragments")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/config.rs"]
mod tests;
