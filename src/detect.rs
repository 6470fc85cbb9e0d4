//! Detection
//!
//! The build runs only if the requirement files resolve. A passing
//! detection offers `site-packages` and asks for `cpython` and `pip` at
//! build time.

use crate::config::BuildEnvironment;
use crate::error::PipInstallResult;
use crate::plan::{CPYTHON, PIP, SITE_PACKAGES};
use crate::requirements::RequirementSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata attached to a requirement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlanMetadata {
    /// Needed at build time
    pub build: bool,
}

/// A capability this build offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    pub name: String,
}

/// A capability this build needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub metadata: BuildPlanMetadata,
}

/// Plan contributed by a passing detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectPlan {
    pub provides: Vec<Provision>,
    pub requires: Vec<Requirement>,
}

impl DetectPlan {
    /// Serialize to TOML
    pub fn to_toml(&self) -> PipInstallResult<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Check the project and return the plan it contributes
pub async fn detect(working_dir: &Path, env: &BuildEnvironment) -> PipInstallResult<DetectPlan> {
    RequirementSpec::resolve(working_dir, env.requirement_override()).await?;

    let at_build = BuildPlanMetadata { build: true };
    Ok(DetectPlan {
        provides: vec![Provision {
            name: SITE_PACKAGES.to_string(),
        }],
        requires: vec![
            Requirement {
                name: CPYTHON.to_string(),
                metadata: at_build,
            },
            Requirement {
                name: PIP.to_string(),
                metadata: at_build,
            },
        ],
    })
}
