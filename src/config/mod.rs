//! Build configuration for pip-install
//!
//! Environment values are read once per invocation into a [`BuildEnvironment`]
//! snapshot which is then handed to every component that needs it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable names consumed and produced by the build
pub mod names {
    /// Space-separated list of requirement files
    pub const REQUIREMENT: &str = "BP_PIP_REQUIREMENT";
    /// Vendored package directory, relative to the working directory
    pub const DEST_PATH: &str = "BP_PIP_DEST_PATH";
    /// Buildpack-specific extra find-links sources
    pub const BP_FIND_LINKS: &str = "BP_PIP_FIND_LINKS";
    /// pip's own find-links variable
    pub const PIP_FIND_LINKS: &str = "PIP_FIND_LINKS";
    /// Install root for `pip install --user`
    pub const PYTHONUSERBASE: &str = "PYTHONUSERBASE";
    /// Runtime module search path
    pub const PYTHONPATH: &str = "PYTHONPATH";
}

/// Requirement file used when `BP_PIP_REQUIREMENT` is unset
pub const DEFAULT_REQUIREMENT: &str = "requirements.txt";

/// Vendor directory used when `BP_PIP_DEST_PATH` is unset
pub const DEFAULT_VENDOR_DIR: &str = "vendor";

/// Immutable snapshot of the process environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    vars: BTreeMap<String, String>,
}

impl BuildEnvironment {
    /// Snapshot the current process environment
    pub fn capture() -> Self {
        let env = Self::from_vars(std::env::vars());
        debug!("Captured {} environment variables", env.vars.len());
        env
    }

    /// Build a snapshot from explicit key/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a single variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Requirement file override, if set
    pub fn requirement_override(&self) -> Option<&str> {
        self.get(names::REQUIREMENT)
    }

    /// Vendored package directory for a project
    pub fn vendor_dir(&self, working_dir: &Path) -> PathBuf {
        let name = self.get(names::DEST_PATH).unwrap_or(DEFAULT_VENDOR_DIR);
        working_dir.join(name)
    }

    /// Buildpack-specific find-links value
    pub fn bp_find_links(&self) -> &str {
        self.get(names::BP_FIND_LINKS).unwrap_or_default()
    }

    /// pip-native find-links value
    pub fn pip_find_links(&self) -> &str {
        self.get(names::PIP_FIND_LINKS).unwrap_or_default()
    }

    /// Full child process environment: the snapshot with `overrides` applied
    pub fn child_env(&self, overrides: &[(&str, String)]) -> Vec<(String, String)> {
        let mut env = self.vars.clone();
        for (key, value) in overrides {
            env.insert((*key).to_string(), value.clone());
        }
        env.into_iter().collect()
    }
}
