//! CLI argument definitions using clap derive

use crate::sbom::SbomFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Pip Install - installs Python packages into a build layer
///
/// Runs `pip install` against the project's requirement files and exposes
/// the resulting site-packages directory to later build stages.
#[derive(Parser, Debug)]
#[command(name = "pip-install")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the project's requirement files exist
    Detect(DetectArgs),

    /// Install dependencies into the packages layer
    Build(BuildArgs),
}

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Project directory
    #[arg(short, long, env = "CNB_APP_DIR", default_value = ".")]
    pub working_dir: PathBuf,

    /// Write the detection plan here instead of stdout
    #[arg(long, env = "CNB_BUILD_PLAN_PATH")]
    pub plan: Option<PathBuf>,
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Project directory
    #[arg(short, long, env = "CNB_APP_DIR", default_value = ".")]
    pub working_dir: PathBuf,

    /// Directory the layers are written to
    #[arg(short, long, env = "CNB_LAYERS_DIR")]
    pub layers: PathBuf,

    /// Build plan with entries requesting site-packages
    #[arg(long, env = "CNB_BP_PLAN_PATH")]
    pub plan: Option<PathBuf>,

    /// SBOM media types to write (repeatable, defaults to all)
    #[arg(long = "sbom-format", value_name = "MEDIA_TYPE")]
    pub sbom_formats: Vec<String>,

    /// pip executable
    #[arg(long, default_value = "pip")]
    pub pip: String,

    /// Python interpreter used to locate site-packages
    #[arg(long, default_value = "python")]
    pub python: String,
}

impl BuildArgs {
    /// Requested SBOM formats, or every supported one
    pub fn sbom_formats(&self) -> Vec<String> {
        if self.sbom_formats.is_empty() {
            SbomFormat::all()
                .iter()
                .map(|format| format.media_type().to_string())
                .collect()
        } else {
            self.sbom_formats.clone()
        }
    }
}
