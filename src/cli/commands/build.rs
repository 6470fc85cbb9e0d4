//! Build command - install dependencies and write the layers

use crate::build::{Build, BuildContext, BuildpackInfo};
use crate::cli::args::BuildArgs;
use crate::config::BuildEnvironment;
use crate::error::PipInstallResult;
use crate::exec::ProcessExecutable;
use crate::install::PipInstallProcess;
use crate::layer::{LayerStore, Layers};
use crate::plan::{BuildPlan, Planner};
use crate::sbom::DirectoryScanner;
use crate::site::SiteProcess;
use crate::ui::Emitter;
use std::sync::Arc;
use tracing::debug;

const BUILDPACK_NAME: &str = "Pip Install Buildpack";

/// Execute the build command
pub async fn execute(args: BuildArgs, env: &BuildEnvironment) -> PipInstallResult<()> {
    let emitter = Emitter::stdout();

    let plan = match &args.plan {
        Some(path) => BuildPlan::from_file(path).await?,
        None => BuildPlan::default(),
    };
    debug!("Build plan has {} entries", plan.entries.len());

    let layers = Arc::new(Layers::new(&args.layers));
    let build = Build::new(
        Arc::new(Planner),
        Arc::new(PipInstallProcess::new(
            Arc::new(ProcessExecutable::new(&args.pip)),
            env.clone(),
            emitter.clone(),
        )),
        Arc::new(SiteProcess::new(
            Arc::new(ProcessExecutable::new(&args.python)),
            env.clone(),
        )),
        Arc::new(DirectoryScanner::new()),
        emitter,
    );

    let result = build
        .run(BuildContext {
            buildpack: BuildpackInfo {
                name: BUILDPACK_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                sbom_formats: args.sbom_formats(),
            },
            working_dir: args.working_dir.clone(),
            plan,
            layers: layers.clone(),
        })
        .await?;

    for layer in &result.layers {
        layers.commit(layer).await?;
    }

    Ok(())
}
