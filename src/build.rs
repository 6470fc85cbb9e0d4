//! Build orchestration
//!
//! A build runs linearly and stops at the first error:
//!
//! 1. acquire the `packages` and `cache` layers
//! 2. install dependencies into `packages`, with pip caching into `cache`
//! 3. set layer flags from the merged build plan
//! 4. locate the site-packages directory inside `packages`
//! 5. generate and attach the bill of materials
//! 6. prepend site-packages to `PYTHONPATH` for later stages
//! 7. return `packages`, plus `cache` if pip wrote anything into it

use crate::config::names;
use crate::error::{PipInstallError, PipInstallResult};
use crate::install::InstallProcess;
use crate::layer::{path_list_separator, Layer, LayerFlags, LayerStore, CACHE_LAYER, PACKAGES_LAYER};
use crate::plan::{BuildPlan, EntryResolver, SITE_PACKAGES};
use crate::sbom::SbomGenerator;
use crate::site::SitePackagesProcess;
use crate::ui::Emitter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Name and version shown in the build log, plus requested SBOM formats
#[derive(Debug, Clone, Default)]
pub struct BuildpackInfo {
    pub name: String,
    pub version: String,
    pub sbom_formats: Vec<String>,
}

/// Inputs for one build
pub struct BuildContext {
    pub buildpack: BuildpackInfo,
    pub working_dir: PathBuf,
    pub plan: BuildPlan,
    pub layers: Arc<dyn LayerStore>,
}

/// Layers the build produced, ready to be committed
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub layers: Vec<Layer>,
}

impl BuildResult {
    /// Find a produced layer by name
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }
}

/// The build step with its capabilities injected
pub struct Build {
    entry_resolver: Arc<dyn EntryResolver>,
    install: Arc<dyn InstallProcess>,
    site: Arc<dyn SitePackagesProcess>,
    sbom: Arc<dyn SbomGenerator>,
    emitter: Emitter,
}

impl Build {
    pub fn new(
        entry_resolver: Arc<dyn EntryResolver>,
        install: Arc<dyn InstallProcess>,
        site: Arc<dyn SitePackagesProcess>,
        sbom: Arc<dyn SbomGenerator>,
        emitter: Emitter,
    ) -> Self {
        Self {
            entry_resolver,
            install,
            site,
            sbom,
            emitter,
        }
    }

    pub async fn run(&self, ctx: BuildContext) -> PipInstallResult<BuildResult> {
        self.emitter
            .title(&format!("{} {}", ctx.buildpack.name, ctx.buildpack.version));

        let packages = ctx.layers.get(PACKAGES_LAYER).await?;
        let cache = ctx.layers.get(CACHE_LAYER).await?;
        let mut packages = ctx.layers.reset(packages).await?;

        self.emitter.process("Executing build process");
        let started = Instant::now();
        self.install
            .execute(&ctx.working_dir, &packages.path, &cache.path)
            .await?;
        self.emitter
            .action(&format!("Completed in {:?}", round_to_millis(started.elapsed())));
        self.emitter.break_line();

        packages
            .metadata
            .insert("built_at".to_string(), chrono::Utc::now().to_rfc3339().into());

        let (launch, build) = self
            .entry_resolver
            .merge_layer_types(SITE_PACKAGES, &ctx.plan.entries);
        let mut packages = packages.with_flags(LayerFlags::for_packages(launch, build));
        let cache = cache.with_flags(LayerFlags::cache_only());
        debug!("packages layer flags: {:?}", packages.flags);

        let site_packages = self.site.execute(&packages.path).await?;

        self.emitter.process(&format!(
            "Generating SBOM for {}",
            ctx.working_dir.display()
        ));
        let started = Instant::now();
        let sbom = self.sbom.generate(&ctx.working_dir).await?;
        self.emitter
            .action(&format!("Completed in {:?}", round_to_millis(started.elapsed())));
        self.emitter.break_line();

        self.emitter
            .process("Writing SBOM in the following format(s):");
        for format in &ctx.buildpack.sbom_formats {
            self.emitter.subprocess(format);
        }
        self.emitter.break_line();
        packages.sbom = sbom.in_formats(&ctx.buildpack.sbom_formats)?;

        packages
            .shared_env
            .prepend(names::PYTHONPATH, site_packages, path_list_separator());
        self.emitter.process("Configuring environment");
        self.emitter.environment(&packages.shared_env);
        self.emitter.break_line();

        let mut layers = vec![packages];
        if has_contents(&cache.path).await? {
            info!("Keeping populated cache layer {}", cache.path.display());
            layers.push(cache);
        } else {
            debug!("Cache layer {} is empty, dropping it", cache.path.display());
        }

        Ok(BuildResult { layers })
    }
}

/// Round to the nearest millisecond, halves away from zero
fn round_to_millis(elapsed: Duration) -> Duration {
    let millis = (elapsed.as_micros() + 500) / 1000;
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}

/// True if `path` is a directory with at least one entry
async fn has_contents(path: &Path) -> PipInstallResult<bool> {
    let mut entries = match tokio::fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(PipInstallError::io(
                format!("reading cache layer {}", path.display()),
                e,
            ))
        }
    };
    let first = entries
        .next_entry()
        .await
        .map_err(|e| PipInstallError::io(format!("reading cache layer {}", path.display()), e))?;
    Ok(first.is_some())
}
