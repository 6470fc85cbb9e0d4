//! Error types for pip-install
//!
//! All modules use `PipInstallResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pip-install operations
pub type PipInstallResult<T> = Result<T, PipInstallError>;

/// All errors that can occur while detecting or building
#[derive(Error, Debug)]
pub enum PipInstallError {
    // Configuration errors
    #[error("requirements file not found at: {}", quote_join(.0))]
    RequirementsNotFound(Vec<String>),

    #[error("unsupported SBOM format: '{0}'")]
    UnsupportedSbomFormat(String),

    #[error("Invalid build plan at {path}: {reason}")]
    PlanInvalid { path: PathBuf, reason: String },

    #[error("Invalid layer metadata at {path}: {reason}")]
    LayerMetadataInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command {command} exited with {}", exit_code(.code))]
    CommandExit {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("pip install failed: {source}")]
    InstallFailed {
        #[source]
        source: Box<PipInstallError>,
    },

    #[error("failed to locate site packages:\n{output}\nerror: {source}")]
    SitePackagesLocate {
        output: String,
        #[source]
        source: Box<PipInstallError>,
    },

    #[error("failed to locate site packages: output is empty")]
    SitePackagesEmpty,

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

fn quote_join(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "signal".to_string(),
    }
}

impl PipInstallError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether this error means detection should fail rather than error out
    pub fn is_detect_failure(&self) -> bool {
        matches!(self, Self::RequirementsNotFound(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RequirementsNotFound(_) => Some(
                "Add a requirements.txt or set BP_PIP_REQUIREMENT to a space-separated list of files",
            ),
            Self::UnsupportedSbomFormat(_) => Some(
                "Supported formats: application/vnd.cyclonedx+json, application/spdx+json, application/vnd.syft+json",
            ),
            _ => None,
        }
    }
}
