//! Pip Install - installs a Python project's dependencies into a build layer
//!
//! Resolves the project's requirement files, runs `pip install` online or
//! from a vendored directory, and exports the site-packages path to later
//! stages through the packages layer's environment.

pub mod build;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod exec;
pub mod install;
pub mod layer;
pub mod plan;
pub mod requirements;
pub mod sbom;
pub mod site;
pub mod ui;

pub use error::{PipInstallError, PipInstallResult};
