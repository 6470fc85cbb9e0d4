//! pip install invocation

use crate::config::{names, BuildEnvironment};
use crate::error::{PipInstallError, PipInstallResult};
use crate::exec::{Executable, Execution};
use crate::install::args::{build_args, InstallMode};
use crate::install::InstallProcess;
use crate::requirements::RequirementSpec;
use crate::ui::Emitter;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Installs requirements with `pip install --user`
pub struct PipInstallProcess {
    executable: Arc<dyn Executable>,
    env: BuildEnvironment,
    emitter: Emitter,
}

impl PipInstallProcess {
    pub fn new(executable: Arc<dyn Executable>, env: BuildEnvironment, emitter: Emitter) -> Self {
        Self {
            executable,
            env,
            emitter,
        }
    }
}

/// Combine find-links sources into pip's space-separated form.
///
/// Explicit sources come first so they win over the vendor directory.
pub fn combine_find_links(bp_find_links: &str, pip_find_links: &str, vendor: Option<&Path>) -> String {
    let vendor = vendor.map(|path| path.display().to_string());
    [bp_find_links, pip_find_links, vendor.as_deref().unwrap_or_default()]
        .iter()
        .map(|source| source.trim())
        .filter(|source| !source.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl InstallProcess for PipInstallProcess {
    async fn execute(
        &self,
        working_dir: &Path,
        target_dir: &Path,
        cache_dir: &Path,
    ) -> PipInstallResult<()> {
        let requirements =
            RequirementSpec::resolve(working_dir, self.env.requirement_override()).await?;

        let vendor_dir = self.env.vendor_dir(working_dir);
        let vendored = tokio::fs::try_exists(&vendor_dir)
            .await
            .map_err(|e| PipInstallError::io(format!("checking {}", vendor_dir.display()), e))?;
        let (mode, vendor) = if vendored {
            (InstallMode::Offline, Some(vendor_dir.as_path()))
        } else {
            (InstallMode::Online, None)
        };
        info!("Installing in {} mode", mode);

        let find_links = combine_find_links(
            self.env.bp_find_links(),
            self.env.pip_find_links(),
            vendor,
        );
        let args = build_args(mode, cache_dir, &requirements);

        let mut overrides = vec![(names::PYTHONUSERBASE, target_dir.display().to_string())];
        let mut shown = format!("{}={}", names::PYTHONUSERBASE, target_dir.display());
        if !find_links.is_empty() {
            shown.push_str(&format!(" {}=\"{}\"", names::PIP_FIND_LINKS, find_links));
            overrides.push((names::PIP_FIND_LINKS, find_links));
        }
        self.emitter
            .subprocess(&format!("Running '{} pip {}'", shown, args.join(" ")));

        self.executable
            .execute(Execution {
                args,
                env: self.env.child_env(&overrides),
                dir: Some(working_dir.to_path_buf()),
                stream: Some(self.emitter.clone()),
            })
            .await
            .map_err(|e| PipInstallError::InstallFailed {
                source: Box::new(e),
            })?;

        debug!("pip install finished for {}", working_dir.display());
        Ok(())
    }
}
