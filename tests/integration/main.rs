//! Integration tests for pip-install

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    pub fn pip_install() -> Command {
        let mut cmd = cargo_bin_cmd!("pip-install");
        for name in [
            "CNB_APP_DIR",
            "CNB_LAYERS_DIR",
            "CNB_BP_PLAN_PATH",
            "CNB_BUILD_PLAN_PATH",
            "BP_PIP_REQUIREMENT",
            "BP_PIP_DEST_PATH",
            "BP_PIP_FIND_LINKS",
            "PIP_FIND_LINKS",
        ] {
            cmd.env_remove(name);
        }
        cmd
    }

    #[test]
    fn help_displays() {
        pip_install()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("installs Python packages"));
    }

    #[test]
    fn version_displays() {
        pip_install()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pip-install"));
    }

    #[test]
    fn build_help() {
        pip_install()
            .args(["build", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--sbom-format"));
    }

    #[test]
    fn detect_prints_plan() {
        let app = TempDir::new().unwrap();
        std::fs::write(app.path().join("requirements.txt"), "flask==3.0.0\n").unwrap();

        pip_install()
            .args(["detect", "--working-dir"])
            .arg(app.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("[[provides]]"))
            .stdout(predicate::str::contains("name = \"site-packages\""))
            .stdout(predicate::str::contains("name = \"cpython\""))
            .stdout(predicate::str::contains("name = \"pip\""));
    }

    #[test]
    fn detect_writes_plan_file() {
        let app = TempDir::new().unwrap();
        std::fs::write(app.path().join("requirements-dev.txt"), "").unwrap();
        let plan = app.path().join("plan.toml");

        pip_install()
            .env("BP_PIP_REQUIREMENT", "requirements-dev.txt")
            .args(["detect", "--working-dir"])
            .arg(app.path())
            .arg("--plan")
            .arg(&plan)
            .assert()
            .success();

        let content = std::fs::read_to_string(plan).unwrap();
        assert!(content.contains("build = true"));
    }

    #[test]
    fn detect_fails_without_requirements() {
        let app = TempDir::new().unwrap();

        pip_install()
            .env("BP_PIP_REQUIREMENT", "requirements.txt other.txt")
            .args(["detect", "--working-dir"])
            .arg(app.path())
            .assert()
            .code(100)
            .stderr(predicate::str::contains(
                "requirements file not found at: 'requirements.txt', 'other.txt'",
            ))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn build_without_requirements_exits_with_error() {
        let app = TempDir::new().unwrap();
        let layers = TempDir::new().unwrap();

        pip_install()
            .args(["build", "--working-dir"])
            .arg(app.path())
            .arg("--layers")
            .arg(layers.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "requirements file not found at: 'requirements.txt'",
            ));
    }

    #[test]
    fn build_rejects_invalid_plan() {
        let app = TempDir::new().unwrap();
        let layers = TempDir::new().unwrap();
        let plan = app.path().join("plan.toml");
        std::fs::write(&plan, "entries = 42\n").unwrap();

        pip_install()
            .args(["build", "--working-dir"])
            .arg(app.path())
            .arg("--layers")
            .arg(layers.path())
            .arg("--plan")
            .arg(&plan)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"));
    }
}

#[cfg(unix)]
mod build_tests {
    use super::cli_tests::pip_install;
    use predicates::prelude::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Stand-in for pip: records its arguments and find-links, fills the
    /// cache directory when given one, and installs a fake distribution.
    const FAKE_PIP: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$RECORD_DIR/args"
printf '%s' "$PIP_FIND_LINKS" > "$RECORD_DIR/find-links"
printf '%s' "$PYTHONUSERBASE" > "$RECORD_DIR/user-base"
for arg in "$@"; do
  case "$arg" in
    --cache-dir=*)
      dir="${arg#--cache-dir=}"
      mkdir -p "$dir"
      echo cached > "$dir/http-cache"
      ;;
  esac
done
mkdir -p "$PYTHONUSERBASE/lib/site-packages"
echo "Successfully installed flask-3.0.0"
"#;

    const FAKE_PYTHON: &str = r#"#!/bin/sh
echo "$PYTHONUSERBASE/lib/site-packages"
"#;

    const FAILING_PIP: &str = r#"#!/bin/sh
echo "ERROR: No matching distribution found for flask" >&2
exit 1
"#;

    struct Project {
        app: TempDir,
        layers: TempDir,
        tools: TempDir,
    }

    impl Project {
        fn new() -> Self {
            let project = Self {
                app: TempDir::new().unwrap(),
                layers: TempDir::new().unwrap(),
                tools: TempDir::new().unwrap(),
            };
            std::fs::write(
                project.app.path().join("requirements.txt"),
                "flask==3.0.0\n",
            )
            .unwrap();
            project.script("pip", FAKE_PIP);
            project.script("python", FAKE_PYTHON);
            project
        }

        fn script(&self, name: &str, body: &str) -> PathBuf {
            let path = self.tools.path().join(name);
            std::fs::write(&path, body).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn build(&self) -> assert_cmd::Command {
            let mut cmd = pip_install();
            cmd.env("RECORD_DIR", self.tools.path())
                .arg("build")
                .arg("--working-dir")
                .arg(self.app.path())
                .arg("--layers")
                .arg(self.layers.path())
                .arg("--pip")
                .arg(self.tools.path().join("pip"))
                .arg("--python")
                .arg(self.tools.path().join("python"));
            cmd
        }

        fn recorded(&self, name: &str) -> String {
            std::fs::read_to_string(self.tools.path().join(name)).unwrap()
        }

        fn layer_file(&self, name: &str) -> PathBuf {
            self.layers.path().join(name)
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn online_build_writes_layers() {
        let project = Project::new();
        let plan = project.app.path().join("plan.toml");
        std::fs::write(
            &plan,
            "[[entries]]\nname = \"site-packages\"\n\n[entries.metadata]\nlaunch = true\n",
        )
        .unwrap();

        project
            .build()
            .arg("--plan")
            .arg(&plan)
            .assert()
            .success()
            .stdout(predicate::str::contains("Executing build process"))
            .stdout(predicate::str::contains("Successfully installed flask-3.0.0"))
            .stdout(predicate::str::contains("PYTHONPATH"));

        let args = project.recorded("args");
        let cache_dir = project.layer_file("cache");
        assert!(args.starts_with("install\n--exists-action=w\n"));
        assert!(args.contains(&format!("--cache-dir={}\n", cache_dir.display())));
        assert!(args.contains("--requirement=requirements.txt"));
        assert!(!args.contains("--no-index"));
        assert_eq!(
            project.recorded("user-base"),
            project.layer_file("packages").display().to_string()
        );

        let packages_toml = read(&project.layer_file("packages.toml"));
        assert!(packages_toml.contains("launch = true"));
        assert!(packages_toml.contains("cache = true"));
        assert!(packages_toml.contains("built_at"));

        let prepend = read(
            &project
                .layer_file("packages")
                .join("env")
                .join("PYTHONPATH.prepend"),
        );
        assert_eq!(
            prepend,
            project
                .layer_file("packages")
                .join("lib")
                .join("site-packages")
                .display()
                .to_string()
        );
        assert_eq!(
            read(&project.layer_file("packages").join("env").join("PYTHONPATH.delim")),
            ":"
        );

        assert!(project.layer_file("cache.toml").is_file());
        for ext in ["cdx.json", "spdx.json", "syft.json"] {
            let sbom = read(&project.layer_file(&format!("packages.sbom.{}", ext)));
            assert!(sbom.contains("flask"), "{} missing package", ext);
        }
    }

    #[test]
    fn vendored_build_installs_offline() {
        let project = Project::new();
        let vendor = project.app.path().join("vendor");
        std::fs::create_dir(&vendor).unwrap();
        std::fs::write(vendor.join("flask-3.0.0-py3-none-any.whl"), "").unwrap();

        project
            .build()
            .env("BP_PIP_FIND_LINKS", "https://example.org/wheels")
            .args(["--sbom-format", "application/spdx+json"])
            .assert()
            .success();

        let args = project.recorded("args");
        assert!(args.contains("--ignore-installed\n"));
        assert!(args.contains("--no-index\n"));
        assert!(!args.contains("--cache-dir"));
        assert_eq!(
            project.recorded("find-links"),
            format!("https://example.org/wheels {}", vendor.display())
        );

        assert!(!project.layer_file("cache.toml").exists());
        assert!(project.layer_file("packages.sbom.spdx.json").is_file());
        assert!(!project.layer_file("packages.sbom.cdx.json").exists());
    }

    #[test]
    fn failed_install_exits_with_error() {
        let project = Project::new();
        project.script("pip", FAILING_PIP);

        project
            .build()
            .assert()
            .code(1)
            .stdout(predicate::str::contains("No matching distribution"))
            .stderr(predicate::str::contains("pip install failed"));

        assert!(!project.layer_file("packages.toml").exists());
    }

    #[test]
    fn unsupported_sbom_format_fails() {
        let project = Project::new();

        project
            .build()
            .args(["--sbom-format", "text/plain"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("unsupported SBOM format: 'text/plain'"));
    }
}
