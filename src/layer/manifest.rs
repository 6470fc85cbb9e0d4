//! Layer metadata file
//!
//! Each layer has a `<name>.toml` next to its directory recording which
//! stages keep it and any free-form metadata from the last build.

use crate::error::{PipInstallError, PipInstallResult};
use crate::layer::LayerFlags;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed `<name>.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerManifest {
    /// Build/launch/cache flags
    #[serde(default)]
    pub types: LayerFlags,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: toml::Table,
}

impl LayerManifest {
    /// Parse a manifest from a TOML file on disk
    pub async fn from_file(path: &Path) -> PipInstallResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            PipInstallError::io(format!("reading layer metadata {}", path.display()), e)
        })?;
        toml::from_str(&content).map_err(|e| PipInstallError::LayerMetadataInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> PipInstallResult<String> {
        Ok(toml::to_string(self)?)
    }
}
