//! Build plan entries and their resolution
//!
//! Later buildpacks ask for `site-packages` through plan entries whose
//! metadata says whether they need it at build time, launch time, or both.

use crate::error::{PipInstallError, PipInstallResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capability this build provides
pub const SITE_PACKAGES: &str = "site-packages";

/// Python runtime capability
pub const CPYTHON: &str = "cpython";

/// pip capability
pub const PIP: &str = "pip";

/// One request for a capability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPlanEntry {
    pub name: String,
    #[serde(default)]
    pub metadata: toml::Table,
}

impl BuildPlanEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: toml::Table::new(),
        }
    }

    /// Set a boolean metadata flag
    pub fn with_flag(mut self, key: &str, value: bool) -> Self {
        self.metadata.insert(key.to_string(), toml::Value::Boolean(value));
        self
    }

    fn flag(&self, key: &str) -> bool {
        self.metadata
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(false)
    }
}

/// Entries handed to this build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPlan {
    #[serde(default)]
    pub entries: Vec<BuildPlanEntry>,
}

impl BuildPlan {
    /// Load a plan from a TOML file
    pub async fn from_file(path: &Path) -> PipInstallResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            PipInstallError::io(format!("reading build plan {}", path.display()), e)
        })?;
        toml::from_str(&content).map_err(|e| PipInstallError::PlanInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Merges plan entries for one capability
pub trait EntryResolver: Send + Sync {
    /// Returns `(launch, build)`
    fn merge_layer_types(&self, name: &str, entries: &[BuildPlanEntry]) -> (bool, bool);
}

/// Needed at a stage if any entry for the capability asks for it
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl EntryResolver for Planner {
    fn merge_layer_types(&self, name: &str, entries: &[BuildPlanEntry]) -> (bool, bool) {
        entries
            .iter()
            .filter(|entry| entry.name == name)
            .fold((false, false), |(launch, build), entry| {
                (launch || entry.flag("launch"), build || entry.flag("build"))
            })
    }
}
