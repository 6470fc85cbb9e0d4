//! pip argument synthesis
//!
//! Pure: the mode is decided upstream and passed in.

use crate::requirements::RequirementSpec;
use std::fmt;
use std::path::Path;

/// How pip reaches packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Package index over the network, with a persistent cache
    Online,
    /// Vendored packages only, no index
    Offline,
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Arguments for `pip` in the given mode
pub fn build_args(mode: InstallMode, cache_path: &Path, requirements: &RequirementSpec) -> Vec<String> {
    let mut args: Vec<String> = match mode {
        InstallMode::Online => vec![
            "install".to_string(),
            "--exists-action=w".to_string(),
            format!("--cache-dir={}", cache_path.display()),
            "--compile".to_string(),
            "--user".to_string(),
            "--disable-pip-version-check".to_string(),
        ],
        InstallMode::Offline => vec![
            "install".to_string(),
            "--ignore-installed".to_string(),
            "--exists-action=w".to_string(),
            "--no-index".to_string(),
            "--compile".to_string(),
            "--user".to_string(),
            "--disable-pip-version-check".to_string(),
        ],
    };

    args.extend(
        requirements
            .names()
            .iter()
            .map(|name| format!("--requirement={}", name)),
    );
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> RequirementSpec {
        RequirementSpec::from_names(["requirements.txt", "requirements-dev.txt"])
    }

    #[test]
    fn online_args() {
        let args = build_args(InstallMode::Online, Path::new("/layers/cache"), &spec());
        assert_eq!(
            args,
            vec![
                "install",
                "--exists-action=w",
                "--cache-dir=/layers/cache",
                "--compile",
                "--user",
                "--disable-pip-version-check",
                "--requirement=requirements.txt",
                "--requirement=requirements-dev.txt",
            ]
        );
    }

    #[test]
    fn offline_args() {
        let args = build_args(InstallMode::Offline, Path::new("/layers/cache"), &spec());
        assert_eq!(
            args,
            vec![
                "install",
                "--ignore-installed",
                "--exists-action=w",
                "--no-index",
                "--compile",
                "--user",
                "--disable-pip-version-check",
                "--requirement=requirements.txt",
                "--requirement=requirements-dev.txt",
            ]
        );
    }

    #[test]
    fn online_never_disables_index() {
        for names in [vec!["a.txt"], vec!["a.txt", "b.txt", "c.txt"]] {
            let args = build_args(
                InstallMode::Online,
                Path::new("/cache"),
                &RequirementSpec::from_names(names),
            );
            assert!(!args.iter().any(|a| a == "--no-index"));
            assert!(!args.iter().any(|a| a == "--ignore-installed"));
        }
    }

    #[test]
    fn offline_never_uses_cache_dir() {
        let args = build_args(InstallMode::Offline, Path::new("/cache"), &spec());
        assert!(args.iter().any(|a| a == "--no-index"));
        assert!(args.iter().any(|a| a == "--ignore-installed"));
        assert!(!args.iter().any(|a| a.starts_with("--cache-dir")));
    }

    #[test]
    fn repeated_calls_agree() {
        let first = build_args(InstallMode::Online, Path::new("/cache"), &spec());
        let second = build_args(InstallMode::Online, Path::new("/cache"), &spec());
        assert_eq!(first, second);
    }

    #[test]
    fn mode_display() {
        assert_eq!(InstallMode::Online.to_string(), "online");
        assert_eq!(InstallMode::Offline.to_string(), "offline");
    }
}
