//! Process execution
//!
//! Builds never spawn processes directly: they describe an [`Execution`] and
//! hand it to an [`Executable`], so tests can substitute a recording fake.

mod process;

pub use process::ProcessExecutable;

use crate::error::PipInstallResult;
use crate::ui::Emitter;
use async_trait::async_trait;
use std::path::PathBuf;

/// One invocation of an executable
#[derive(Debug, Clone, Default)]
pub struct Execution {
    /// Arguments, not including the program name
    pub args: Vec<String>,
    /// Complete environment of the child process
    pub env: Vec<(String, String)>,
    /// Working directory (inherits the current one if unset)
    pub dir: Option<PathBuf>,
    /// Forward each output line to the build log as it arrives
    pub stream: Option<Emitter>,
}

impl Execution {
    /// Value of `name` in the child environment
    pub fn env_value(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Something that can run an [`Execution`]
#[async_trait]
pub trait Executable: Send + Sync {
    /// Run to completion and return combined stdout and stderr
    ///
    /// A non-zero exit is an error carrying the combined output.
    async fn execute(&self, execution: Execution) -> PipInstallResult<String>;
}
