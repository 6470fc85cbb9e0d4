//! Pip Install - CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pip_install::cli::{Cli, Commands};
use pip_install::config::BuildEnvironment;
use pip_install::error::PipInstallResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code telling the lifecycle that detection did not pass
const DETECT_FAILED: u8 = 100;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let detecting = matches!(cli.command, Commands::Detect(_));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            if detecting && e.is_detect_failure() {
                ExitCode::from(DETECT_FAILED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> PipInstallResult<()> {
    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("pip_install=warn"),
        1 => EnvFilter::new("pip_install=info"),
        _ => EnvFilter::new("pip_install=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let env = BuildEnvironment::capture();

    match cli.command {
        Commands::Detect(args) => pip_install::cli::commands::detect(args, &env).await,
        Commands::Build(args) => pip_install::cli::commands::build(args, &env).await,
    }
}
