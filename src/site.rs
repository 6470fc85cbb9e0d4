//! Site-packages discovery
//!
//! Where pip put the packages depends on the Python version and platform,
//! so the interpreter is asked directly with `python -m site --user-site`.

use crate::config::{names, BuildEnvironment};
use crate::error::{PipInstallError, PipInstallResult};
use crate::exec::{Executable, Execution};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Locates the site-packages directory inside an install root
#[async_trait]
pub trait SitePackagesProcess: Send + Sync {
    async fn execute(&self, layer_path: &Path) -> PipInstallResult<String>;
}

/// Asks the Python interpreter for its user site directory
pub struct SiteProcess {
    executable: Arc<dyn Executable>,
    env: BuildEnvironment,
}

impl SiteProcess {
    pub fn new(executable: Arc<dyn Executable>, env: BuildEnvironment) -> Self {
        Self { executable, env }
    }
}

#[async_trait]
impl SitePackagesProcess for SiteProcess {
    async fn execute(&self, layer_path: &Path) -> PipInstallResult<String> {
        let result = self
            .executable
            .execute(Execution {
                args: vec!["-m".to_string(), "site".to_string(), "--user-site".to_string()],
                env: self
                    .env
                    .child_env(&[(names::PYTHONUSERBASE, layer_path.display().to_string())]),
                dir: None,
                stream: None,
            })
            .await;

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                let output = match &e {
                    PipInstallError::CommandExit { output, .. } => output.clone(),
                    _ => String::new(),
                };
                return Err(PipInstallError::SitePackagesLocate {
                    output,
                    source: Box::new(e),
                });
            }
        };

        let path = output.trim();
        if path.is_empty() {
            return Err(PipInstallError::SitePackagesEmpty);
        }

        debug!("site-packages: {}", path);
        Ok(path.to_string())
    }
}
