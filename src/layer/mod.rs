//! Build layers
//!
//! A layer is a directory of persisted build state plus flags saying which
//! stages keep it. The build produces two: `packages` (the installed
//! dependency tree) and `cache` (pip's own cache).

mod environment;
pub mod manifest;
mod store;

pub use environment::{path_list_separator, Environment};
pub use manifest::LayerManifest;
pub use store::{LayerStore, Layers};

use crate::sbom::SbomFile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Layer holding the installed packages
pub const PACKAGES_LAYER: &str = "packages";

/// Layer holding pip's cache
pub const CACHE_LAYER: &str = "cache";

/// Which stages keep a layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerFlags {
    /// Available to later build steps
    pub build: bool,
    /// Available in the runtime image
    pub launch: bool,
    /// Restored on the next build
    pub cache: bool,
}

impl LayerFlags {
    /// Flags for the packages layer given the merged plan requirements
    pub fn for_packages(launch: bool, build: bool) -> Self {
        Self {
            build,
            launch,
            cache: build || launch,
        }
    }

    /// Kept between builds, never exposed
    pub fn cache_only() -> Self {
        Self {
            build: false,
            launch: false,
            cache: true,
        }
    }
}

/// A named, path-backed unit of build state
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub path: PathBuf,
    pub flags: LayerFlags,
    pub shared_env: Environment,
    pub metadata: toml::Table,
    pub sbom: Vec<SbomFile>,
}

impl Layer {
    /// A fresh layer with no flags, env or metadata
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            flags: LayerFlags::default(),
            shared_env: Environment::default(),
            metadata: toml::Table::new(),
            sbom: Vec::new(),
        }
    }

    /// Apply flags computed by a build step
    pub fn with_flags(mut self, flags: LayerFlags) -> Self {
        self.flags = flags;
        self
    }
}
