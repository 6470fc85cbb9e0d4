//! Layer store
//!
//! Layout under the layers directory:
//!
//! | Path | Content |
//! |------|---------|
//! | `<name>/` | layer contents |
//! | `<name>/env/NAME.<op>` | shared environment |
//! | `<name>.toml` | flags and metadata |
//! | `<name>.sbom.<ext>` | bill of materials |

use crate::error::{PipInstallError, PipInstallResult};
use crate::layer::manifest::LayerManifest;
use crate::layer::Layer;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Storage for build layers
#[async_trait]
pub trait LayerStore: Send + Sync {
    /// Get a layer, restoring flags and metadata from a previous build
    async fn get(&self, name: &str) -> PipInstallResult<Layer>;

    /// Clear a layer's contents and state
    async fn reset(&self, layer: Layer) -> PipInstallResult<Layer>;

    /// Persist a layer's flags, metadata, environment and SBOM
    async fn commit(&self, layer: &Layer) -> PipInstallResult<()>;
}

/// Layer store backed by a directory on disk
#[derive(Debug, Clone)]
pub struct Layers {
    root: PathBuf,
}

impl Layers {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn manifest_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.toml", name))
    }

    async fn create_dir(path: &Path) -> PipInstallResult<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| PipInstallError::io(format!("creating layer {}", path.display()), e))
    }
}

#[async_trait]
impl LayerStore for Layers {
    async fn get(&self, name: &str) -> PipInstallResult<Layer> {
        let path = self.root.join(name);
        Self::create_dir(&path).await?;

        let mut layer = Layer::new(name, path);
        let manifest_path = self.manifest_path(name);
        let exists = fs::try_exists(&manifest_path).await.map_err(|e| {
            PipInstallError::io(format!("checking {}", manifest_path.display()), e)
        })?;

        if exists {
            let manifest = LayerManifest::from_file(&manifest_path).await?;
            debug!("Reusing layer {} ({:?})", name, manifest.types);
            layer.flags = manifest.types;
            layer.metadata = manifest.metadata;
        }

        Ok(layer)
    }

    async fn reset(&self, layer: Layer) -> PipInstallResult<Layer> {
        debug!("Resetting layer {}", layer.name);
        match fs::remove_dir_all(&layer.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(PipInstallError::io(
                    format!("clearing layer {}", layer.path.display()),
                    e,
                ))
            }
        }
        Self::create_dir(&layer.path).await?;
        Ok(Layer::new(layer.name, layer.path))
    }

    async fn commit(&self, layer: &Layer) -> PipInstallResult<()> {
        let manifest = LayerManifest {
            types: layer.flags,
            metadata: layer.metadata.clone(),
        };
        let manifest_path = self.manifest_path(&layer.name);
        fs::write(&manifest_path, manifest.to_toml()?)
            .await
            .map_err(|e| PipInstallError::io(format!("writing {}", manifest_path.display()), e))?;

        if !layer.shared_env.is_empty() {
            let env_dir = layer.path.join("env");
            Self::create_dir(&env_dir).await?;
            for (file, value) in layer.shared_env.entries() {
                let path = env_dir.join(file);
                fs::write(&path, value)
                    .await
                    .map_err(|e| PipInstallError::io(format!("writing {}", path.display()), e))?;
            }
        }

        for sbom in &layer.sbom {
            let path = self
                .root
                .join(format!("{}.sbom.{}", layer.name, sbom.format.extension()));
            fs::write(&path, &sbom.content)
                .await
                .map_err(|e| PipInstallError::io(format!("writing {}", path.display()), e))?;
        }

        debug!("Committed layer {} ({:?})", layer.name, layer.flags);
        Ok(())
    }
}
