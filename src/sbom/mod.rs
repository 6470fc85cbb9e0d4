//! Software bill of materials
//!
//! An [`Sbom`] lists the Python packages found for a directory and can be
//! rendered into any of the supported [`SbomFormat`]s.

mod format;
mod scanner;

pub use format::SbomFormat;
pub use scanner::DirectoryScanner;

use crate::error::PipInstallResult;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Produces a bill of materials for a directory
#[async_trait]
pub trait SbomGenerator: Send + Sync {
    async fn generate(&self, dir: &Path) -> PipInstallResult<Sbom>;
}

/// A single package in the bill of materials
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SbomPackage {
    pub name: String,
    pub version: String,
}

impl SbomPackage {
    /// Package URL (`pkg:pypi/name@version`)
    pub fn purl(&self) -> String {
        format!(
            "pkg:pypi/{}@{}",
            self.name.to_lowercase().replace('_', "-"),
            self.version
        )
    }
}

/// Bill of materials for one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sbom {
    pub source: PathBuf,
    pub packages: Vec<SbomPackage>,
}

/// An SBOM rendered into one output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomFile {
    pub format: SbomFormat,
    pub content: Vec<u8>,
}

impl Sbom {
    /// Render into every requested format, by media type
    ///
    /// Fails on the first unsupported format name.
    pub fn in_formats<S: AsRef<str>>(&self, formats: &[S]) -> PipInstallResult<Vec<SbomFile>> {
        formats
            .iter()
            .map(|name| -> PipInstallResult<SbomFile> {
                let format: SbomFormat = name.as_ref().parse()?;
                Ok(SbomFile {
                    format,
                    content: format.encode(self)?,
                })
            })
            .collect()
    }
}
