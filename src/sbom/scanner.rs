//! Package discovery for the bill of materials
//!
//! Two sources are consulted:
//! 1. Installed distributions: `*.dist-info/METADATA` anywhere under the directory
//! 2. Pinned requirements: `name==version` lines in top-level `requirements*.txt`

use crate::error::{PipInstallError, PipInstallResult};
use crate::sbom::{Sbom, SbomGenerator, SbomPackage};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Scans a directory tree for Python packages
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryScanner;

impl DirectoryScanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SbomGenerator for DirectoryScanner {
    async fn generate(&self, dir: &Path) -> PipInstallResult<Sbom> {
        let mut packages = BTreeSet::new();

        scan_requirement_files(dir, &mut packages).await?;
        scan_dist_info(dir, &mut packages).await?;

        debug!("Found {} packages under {}", packages.len(), dir.display());
        Ok(Sbom {
            source: dir.to_path_buf(),
            packages: packages.into_iter().collect(),
        })
    }
}

async fn read_dir_entries(dir: &Path) -> PipInstallResult<Vec<(PathBuf, bool)>> {
    let mut reader = fs::read_dir(dir)
        .await
        .map_err(|e| PipInstallError::io(format!("reading {}", dir.display()), e))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| PipInstallError::io(format!("reading {}", dir.display()), e))?
    {
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        entries.push((entry.path(), is_dir));
    }
    Ok(entries)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

async fn scan_requirement_files(
    dir: &Path,
    packages: &mut BTreeSet<SbomPackage>,
) -> PipInstallResult<()> {
    for (path, is_dir) in read_dir_entries(dir).await? {
        let name = file_name(&path);
        if is_dir || !name.starts_with("requirements") || !name.ends_with(".txt") {
            continue;
        }
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| PipInstallError::io(format!("reading {}", path.display()), e))?;
        packages.extend(content.lines().filter_map(parse_pinned_requirement));
    }
    Ok(())
}

async fn scan_dist_info(dir: &Path, packages: &mut BTreeSet<SbomPackage>) -> PipInstallResult<()> {
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for (path, is_dir) in read_dir_entries(&current).await? {
            if !is_dir {
                continue;
            }
            let name = file_name(&path);
            if name.ends_with(".dist-info") {
                let metadata = path.join("METADATA");
                match fs::read_to_string(&metadata).await {
                    Ok(content) => packages.extend(parse_metadata(&content)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(PipInstallError::io(
                            format!("reading {}", metadata.display()),
                            e,
                        ))
                    }
                }
            } else if !name.starts_with('.') {
                pending.push(path);
            }
        }
    }

    Ok(())
}

/// Parse the `Name` and `Version` headers of a core metadata file
fn parse_metadata(content: &str) -> Option<SbomPackage> {
    let mut name = None;
    let mut version = None;

    for line in content.lines() {
        // Headers end at the first blank line
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Name:") {
            name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Version:") {
            version = Some(value.trim().to_string());
        }
    }

    Some(SbomPackage {
        name: name?,
        version: version?,
    })
}

/// Parse a `name==version` requirement line, ignoring extras and markers
fn parse_pinned_requirement(line: &str) -> Option<SbomPackage> {
    let line = line.split('#').next()?.split(';').next()?.trim();
    if line.starts_with('-') {
        return None;
    }
    let (name, version) = line.split_once("==")?;
    let name = name.split('[').next()?.trim();
    let version = version.trim();
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some(SbomPackage {
        name: name.to_string(),
        version: version.to_string(),
    })
}
