//! SBOM output formats

use crate::error::{PipInstallError, PipInstallResult};
use crate::sbom::Sbom;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Supported SBOM document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SbomFormat {
    /// CycloneDX JSON
    CycloneDx,
    /// SPDX JSON
    Spdx,
    /// Syft JSON
    Syft,
}

impl SbomFormat {
    /// Media type used to request this format
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::CycloneDx => "application/vnd.cyclonedx+json",
            Self::Spdx => "application/spdx+json",
            Self::Syft => "application/vnd.syft+json",
        }
    }

    /// File extension of the rendered document
    pub fn extension(&self) -> &'static str {
        match self {
            Self::CycloneDx => "cdx.json",
            Self::Spdx => "spdx.json",
            Self::Syft => "syft.json",
        }
    }

    /// All formats, in the order they are offered by default
    pub fn all() -> &'static [Self] {
        &[Self::CycloneDx, Self::Spdx, Self::Syft]
    }

    /// Render `sbom` as a JSON document in this format
    pub fn encode(&self, sbom: &Sbom) -> PipInstallResult<Vec<u8>> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let source = sbom.source.display().to_string();

        let document = match self {
            Self::CycloneDx => json!({
                "bomFormat": "CycloneDX",
                "specVersion": "1.3",
                "serialNumber": format!("urn:uuid:{}", Uuid::new_v4()),
                "version": 1,
                "metadata": {
                    "timestamp": timestamp,
                    "component": { "type": "file", "name": source },
                },
                "components": sbom.packages.iter().map(|p| json!({
                    "type": "library",
                    "name": p.name,
                    "version": p.version,
                    "purl": p.purl(),
                })).collect::<Vec<_>>(),
            }),
            Self::Spdx => json!({
                "spdxVersion": "SPDX-2.2",
                "dataLicense": "CC0-1.0",
                "SPDXID": "SPDXRef-DOCUMENT",
                "name": source,
                "documentNamespace": format!("https://spdx.org/spdxdocs/pip-install-{}", Uuid::new_v4()),
                "creationInfo": {
                    "created": timestamp,
                    "creators": [format!("Tool: pip-install-{}", env!("CARGO_PKG_VERSION"))],
                },
                "packages": sbom.packages.iter().enumerate().map(|(i, p)| json!({
                    "SPDXID": format!("SPDXRef-Package-{}", i),
                    "name": p.name,
                    "versionInfo": p.version,
                    "downloadLocation": "NOASSERTION",
                    "licenseConcluded": "NOASSERTION",
                    "licenseDeclared": "NOASSERTION",
                    "copyrightText": "NOASSERTION",
                    "externalRefs": [{
                        "referenceCategory": "PACKAGE_MANAGER",
                        "referenceType": "purl",
                        "referenceLocator": p.purl(),
                    }],
                })).collect::<Vec<_>>(),
            }),
            Self::Syft => json!({
                "artifacts": sbom.packages.iter().map(|p| json!({
                    "name": p.name,
                    "version": p.version,
                    "type": "python",
                    "language": "python",
                    "purl": p.purl(),
                })).collect::<Vec<_>>(),
                "source": { "type": "directory", "target": source },
                "schema": { "version": "3.0.1" },
            }),
        };

        Ok(serde_json::to_vec_pretty(&document)?)
    }
}

impl FromStr for SbomFormat {
    type Err = PipInstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|format| format.media_type() == s)
            .ok_or_else(|| PipInstallError::UnsupportedSbomFormat(s.to_string()))
    }
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.media_type())
    }
}
