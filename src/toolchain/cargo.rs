//! Cargo workspace compiler
//!
//! Drives `cargo build --release` with `--locked` when the lock is
//! frozen. A lock that would need rewriting is surfaced as
//! `LockMismatch`; any other compile failure becomes `CompileError`
//! carrying the diagnostic tail.

use crate::error::{WheelwrightError, WwResult};
use crate::toolchain::tool::WorkspaceCompiler;
use crate::toolchain::{diagnostic_tail, run_tool, tool_responds};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Compiler backed by the cargo binary
pub struct CargoCompiler {
    program: String,
}

impl CargoCompiler {
    /// Use the `cargo` found on PATH
    pub fn new() -> Self {
        Self {
            program: "cargo".to_string(),
        }
    }

    /// Use a specific cargo binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn is_lock_mismatch(stderr: &str) -> bool {
        stderr.contains("lock file") && (stderr.contains("--locked") || stderr.contains("needs to be updated"))
    }
}

impl Default for CargoCompiler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkspaceCompiler for CargoCompiler {
    async fn is_available(&self) -> bool {
        tool_responds(&self.program).await
    }

    async fn version(&self) -> WwResult<String> {
        let out = run_tool(&self.program, &["--version"], None).await?;
        Ok(out.stdout.trim().to_string())
    }

    async fn compile(
        &self,
        workspace_root: &Path,
        unit: Option<&str>,
        frozen: bool,
    ) -> WwResult<()> {
        let mut args = vec!["build", "--release"];
        if frozen {
            args.push("--locked");
        }
        match unit {
            Some(name) => {
                args.push("-p");
                args.push(name);
            }
            None => args.push("--workspace"),
        }

        info!(
            "Compiling workspace {} ({})",
            workspace_root.display(),
            unit.unwrap_or("all units")
        );

        let out = run_tool(&self.program, &args, Some(workspace_root)).await?;
        if out.success() {
            return Ok(());
        }

        if frozen && Self::is_lock_mismatch(&out.stderr) {
            return Err(WheelwrightError::LockMismatch {
                workspace: workspace_root.to_path_buf(),
                detail: diagnostic_tail("", &out.stderr),
            });
        }

        Err(WheelwrightError::CompileError {
            detail: diagnostic_tail(&out.stdout, &out.stderr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_mismatch_detection() {
        let stderr = "error: the lock file needs to be updated but --locked was passed";
        assert!(CargoCompiler::is_lock_mismatch(stderr));

        let stderr = "error[E0425]: cannot find value `x` in this scope";
        assert!(!CargoCompiler::is_lock_mismatch(stderr));
    }
}
