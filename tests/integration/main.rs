//! Integration tests for Wheelwright

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn wheelwright() -> Command {
        cargo_bin_cmd!("wheelwright")
    }

    /// Command isolated from the developer's real store and config
    fn isolated(store: &TempDir) -> Command {
        let mut cmd = wheelwright();
        cmd.env("WHEELWRIGHT_STORE", store.path())
            .env("WHEELWRIGHT_CONFIG", store.path().join("config.toml"));
        cmd
    }

    fn write_single_package_workspace(root: &std::path::Path, name: &str) {
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(
            root.join("Cargo.toml"),
            format!("[package]\nname = \"{}\"\nversion = \"0.1.0\"\n", name),
        )
        .unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();
    }

    #[test]
    fn help_displays() {
        wheelwright()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "cross-language build orchestrator",
            ));
    }

    #[test]
    fn version_displays() {
        wheelwright()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("wheelwright"));
    }

    #[test]
    fn build_help() {
        wheelwright()
            .args(["build", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Warm the workspace cache"));
    }

    #[test]
    fn status_runs() {
        // Status may report missing tools on a bare machine, but should not panic
        let store = TempDir::new().unwrap();
        let _ = isolated(&store).args(["status", "--no-local"]).assert();
    }

    #[test]
    fn completions_generate() {
        wheelwright()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("wheelwright"));
    }

    #[test]
    fn init_creates_local_config() {
        let temp = TempDir::new().unwrap();
        wheelwright()
            .args(["init", "--path"])
            .arg(temp.path())
            .assert()
            .success();

        let content = fs::read_to_string(temp.path().join(".wheelwright.toml")).unwrap();
        assert!(content.contains("[build]"));
    }

    #[test]
    fn init_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".wheelwright.toml"), "existing").unwrap();

        wheelwright()
            .args(["init", "--path"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn cache_list_empty_store() {
        let store = TempDir::new().unwrap();
        isolated(&store)
            .args(["cache", "list", "--no-local"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No store entries"));
    }

    #[test]
    fn cache_gc_dry_run_empty_store() {
        let store = TempDir::new().unwrap();
        isolated(&store)
            .args(["cache", "gc", "--dry-run", "--no-local"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing older"));
    }

    #[test]
    fn cache_clear_empty_store() {
        let store = TempDir::new().unwrap();
        isolated(&store)
            .args(["cache", "clear", "--yes", "--no-local"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already empty"));
    }

    #[test]
    fn build_without_manifest_fails() {
        let store = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();

        isolated(&store)
            .args(["build", "--no-local", "-w"])
            .arg(ws.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cargo.toml"));
    }

    #[test]
    fn build_without_lockfile_fails_with_hint() {
        let store = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();
        write_single_package_workspace(ws.path(), "demo");

        isolated(&store)
            .args(["build", "--no-local", "-w"])
            .arg(ws.path())
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("Cargo.lock")
                    .and(predicate::str::contains("cargo generate-lockfile")),
            );
    }

    #[test]
    fn build_unknown_package_fails_before_compiling() {
        let store = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();
        write_single_package_workspace(ws.path(), "demo");
        fs::write(ws.path().join("Cargo.lock"), "# lock\n").unwrap();

        isolated(&store)
            .args(["build", "--no-local", "-p", "nope", "-w"])
            .arg(ws.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("No workspace member matches"));
    }

    #[test]
    fn install_without_prefix_fails() {
        let store = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();

        isolated(&store)
            .args(["install", "--no-local", "-w"])
            .arg(ws.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("No install prefix"));
    }

    #[test]
    fn install_without_staged_wheel_fails() {
        let store = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();

        isolated(&store)
            .args(["install", "--no-local", "--prefix"])
            .arg(ws.path().join("prefix"))
            .arg("-w")
            .arg(ws.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("No wheel artifact"));
    }

    #[test]
    fn compose_missing_pyproject_fails() {
        let store = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();

        isolated(&store)
            .args(["compose", "--no-local", "-p", "core", "-w"])
            .arg(ws.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("pyproject.toml"));
    }

    #[test]
    fn compose_without_built_wheel_fails_with_hint() {
        let store = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();
        fs::write(
            ws.path().join("pyproject.toml"),
            "[project]\nname = \"app\"\nversion = \"0.1.0\"\ndependencies = []\n",
        )
        .unwrap();

        isolated(&store)
            .args(["compose", "--no-local", "-p", "core", "-w"])
            .arg(ws.path())
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("does not resolve")
                    .and(predicate::str::contains("wheelwright build")),
            );
    }

    #[test]
    fn compose_rewrites_manifest_from_staged_wheel() {
        let store = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();
        fs::write(
            ws.path().join("pyproject.toml"),
            "[project]\nname = \"app\"\nversion = \"0.1.0\"\ndependencies = []\n",
        )
        .unwrap();

        // A staged wheel is enough: compose resolves by filename
        let staging = ws.path().join("dist/staging");
        fs::create_dir_all(&staging).unwrap();
        fs::write(
            staging.join("demo_core-0.1.0-cp312-cp312-linux_x86_64.whl"),
            "wheel",
        )
        .unwrap();

        isolated(&store)
            .args(["compose", "--no-local", "--dep", "numpy", "--dep", "requests", "-w"])
            .arg(ws.path())
            .assert()
            .success();

        let content = fs::read_to_string(ws.path().join("pyproject.toml")).unwrap();
        assert!(content.contains("\"numpy\""));
        assert!(content.contains("\"requests\""));
        assert!(content.contains("demo_core @ file://"));
    }
}
