//! Detect command - check the project can be built

use crate::cli::args::DetectArgs;
use crate::config::BuildEnvironment;
use crate::detect::detect;
use crate::error::{PipInstallError, PipInstallResult};
use tracing::info;

/// Execute the detect command
pub async fn execute(args: DetectArgs, env: &BuildEnvironment) -> PipInstallResult<()> {
    let plan = detect(&args.working_dir, env).await?;
    let content = plan.to_toml()?;

    match args.plan {
        Some(path) => {
            tokio::fs::write(&path, content)
                .await
                .map_err(|e| PipInstallError::io(format!("writing {}", path.display()), e))?;
            info!("Wrote detection plan to {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}
