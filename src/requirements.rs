//! Requirement file resolution
//!
//! Decides which requirement files govern the build. The list comes from
//! `BP_PIP_REQUIREMENT` (space-separated) and defaults to `requirements.txt`.
//! Every listed file must exist relative to the working directory.

use crate::config::DEFAULT_REQUIREMENT;
use crate::error::{PipInstallError, PipInstallResult};
use std::path::Path;
use tracing::debug;

/// Ordered, validated list of requirement files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementSpec(Vec<String>);

impl RequirementSpec {
    /// Resolve and validate the requirement files for `working_dir`.
    ///
    /// All missing files are reported together, in the order given. Errors
    /// other than "not found" from the existence check are returned as-is.
    pub async fn resolve(working_dir: &Path, overridden: Option<&str>) -> PipInstallResult<Self> {
        let names: Vec<String> = match overridden.filter(|value| !value.trim().is_empty()) {
            Some(value) => value
                .split(' ')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            None => vec![DEFAULT_REQUIREMENT.to_string()],
        };

        let mut missing = Vec::new();
        for name in &names {
            let path = working_dir.join(name);
            let exists = tokio::fs::try_exists(&path)
                .await
                .map_err(|e| PipInstallError::io(format!("checking {}", path.display()), e))?;
            if !exists {
                missing.push(name.clone());
            }
        }

        if !missing.is_empty() {
            return Err(PipInstallError::RequirementsNotFound(missing));
        }

        debug!("Requirement files: {:?}", names);
        Ok(Self(names))
    }

    /// Build a spec without touching the filesystem
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// File names in order
    pub fn names(&self) -> &[String] {
        &self.0
    }
}
