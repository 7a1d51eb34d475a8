//! Maturin wheel builder
//!
//! Builds one workspace unit into a native-extension wheel: release
//! optimization, symbol stripping, portability shims off, lock frozen.
//! The wheel lands in the requested output directory; exactly one must
//! result.

use crate::error::{WheelwrightError, WwResult};
use crate::toolchain::tool::{WheelBuilder, WheelRequest};
use crate::toolchain::{diagnostic_tail, run_tool, tool_responds};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Builder backed by the maturin binary
pub struct MaturinBuilder {
    program: String,
}

impl MaturinBuilder {
    /// Use the `maturin` found on PATH
    pub fn new() -> Self {
        Self {
            program: "maturin".to_string(),
        }
    }

    /// Use a specific maturin binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MaturinBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the single `*.whl` in a directory.
///
/// Zero wheels is `NoArtifact`, more than one is `MultipleArtifacts` -
/// an ambiguous output directory must never flow downstream.
pub fn sole_wheel_in(dir: &Path) -> WwResult<PathBuf> {
    let read = fs::read_dir(dir)
        .map_err(|e| WheelwrightError::io(format!("listing {}", dir.display()), e))?;

    let mut wheels: Vec<PathBuf> = read
        .filter_map(|r| r.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "whl"))
        .collect();

    match wheels.len() {
        0 => Err(WheelwrightError::NoArtifact(dir.to_path_buf())),
        1 => Ok(wheels.remove(0)),
        n => Err(WheelwrightError::MultipleArtifacts {
            dir: dir.to_path_buf(),
            count: n,
        }),
    }
}

#[async_trait]
impl WheelBuilder for MaturinBuilder {
    async fn is_available(&self) -> bool {
        tool_responds(&self.program).await
    }

    async fn version(&self) -> WwResult<String> {
        let out = run_tool(&self.program, &["--version"], None).await?;
        Ok(out.stdout.trim().to_string())
    }

    async fn build(&self, req: &WheelRequest) -> WwResult<PathBuf> {
        tokio::fs::create_dir_all(&req.out_dir).await.map_err(|e| {
            WheelwrightError::io(format!("creating {}", req.out_dir.display()), e)
        })?;

        let manifest = req.manifest_path.display().to_string();
        let out_dir = req.out_dir.display().to_string();
        let mut args = vec!["build", "--release"];
        if req.strip {
            args.push("--strip");
        }
        if req.frozen {
            args.push("--locked");
        }
        args.extend(["--manylinux", req.manylinux.as_str()]);
        args.extend(["-m", manifest.as_str()]);
        args.extend(["-o", out_dir.as_str()]);

        info!("Building wheel for {} via {}", req.unit, self.program);

        let out = run_tool(&self.program, &args, None).await?;
        if !out.success() {
            return Err(WheelwrightError::BuildFailed {
                unit: req.unit.clone(),
                detail: diagnostic_tail(&out.stdout, &out.stderr),
            });
        }

        sole_wheel_in(&req.out_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sole_wheel_happy_path() {
        let temp = TempDir::new().unwrap();
        let wheel = temp.path().join("core-1.0.0-cp312-cp312-linux_x86_64.whl");
        fs::write(&wheel, "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();

        assert_eq!(sole_wheel_in(temp.path()).unwrap(), wheel);
    }

    #[test]
    fn empty_dir_is_no_artifact() {
        let temp = TempDir::new().unwrap();
        let err = sole_wheel_in(temp.path()).unwrap_err();
        assert!(matches!(err, WheelwrightError::NoArtifact(_)));
    }

    #[test]
    fn two_wheels_are_ambiguous() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a-1.0-py3-none-any.whl"), "").unwrap();
        fs::write(temp.path().join("b-1.0-py3-none-any.whl"), "").unwrap();

        let err = sole_wheel_in(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            WheelwrightError::MultipleArtifacts { count: 2, .. }
        ));
    }
}
