//! Dependency installation
//!
//! The mode is chosen by whether the vendor directory exists:
//! - absent: online, pip uses the cache layer as its cache directory
//! - present: offline, pip installs only from the vendored packages

mod args;
mod process;

pub use args::{build_args, InstallMode};
pub use process::{combine_find_links, PipInstallProcess};

use crate::error::PipInstallResult;
use async_trait::async_trait;
use std::path::Path;

/// Installs the project's dependencies into a target directory
#[async_trait]
pub trait InstallProcess: Send + Sync {
    async fn execute(
        &self,
        working_dir: &Path,
        target_dir: &Path,
        cache_dir: &Path,
    ) -> PipInstallResult<()>;
}
