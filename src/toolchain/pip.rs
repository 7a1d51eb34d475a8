//! Offline pip installer
//!
//! Installs a staged wheel into a prefix with every network path closed:
//! `--no-index` forbids remote indexes, `--no-cache-dir` forbids reusing
//! previously downloaded artifacts, and `--find-links` restricts
//! resolution to the local staging directory.

use crate::error::{WheelwrightError, WwResult};
use crate::toolchain::tool::{InstallRequest, WheelInstaller};
use crate::toolchain::{diagnostic_tail, run_tool, tool_responds};
use async_trait::async_trait;
use tracing::info;

/// Installer backed by the pip binary
pub struct PipInstaller {
    program: String,
}

impl PipInstaller {
    /// Use the `pip` found on PATH
    pub fn new() -> Self {
        Self {
            program: "pip".to_string(),
        }
    }

    /// Use a specific pip binary (e.g. `pip3`, a venv pip)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether a pip failure means it needed something only a remote
    /// index could provide.
    fn is_index_fallback(stderr: &str) -> bool {
        stderr.contains("No matching distribution")
            || stderr.contains("Could not find a version that satisfies")
            || stderr.contains("Could not fetch URL")
    }
}

impl Default for PipInstaller {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WheelInstaller for PipInstaller {
    async fn is_available(&self) -> bool {
        tool_responds(&self.program).await
    }

    async fn version(&self) -> WwResult<String> {
        let out = run_tool(&self.program, &["--version"], None).await?;
        Ok(out.stdout.trim().to_string())
    }

    async fn install(&self, req: &InstallRequest) -> WwResult<()> {
        let wheel = req.wheel.display().to_string();
        let find_links = req.find_links.display().to_string();
        let prefix = req.prefix.display().to_string();

        let args = vec![
            "install",
            "--no-index",
            "--no-cache-dir",
            "--find-links",
            find_links.as_str(),
            "--prefix",
            prefix.as_str(),
            wheel.as_str(),
        ];

        info!("Installing {} into {}", wheel, prefix);

        let out = run_tool(&self.program, &args, None).await?;
        if out.success() {
            return Ok(());
        }

        if Self::is_index_fallback(&out.stderr) {
            return Err(WheelwrightError::NetworkFallbackForbidden {
                detail: diagnostic_tail("", &out.stderr),
            });
        }

        Err(WheelwrightError::command_exec(
            format!("{} install", self.program),
            diagnostic_tail(&out.stdout, &out.stderr),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_fallback_detection() {
        let stderr = "ERROR: Could not find a version that satisfies the requirement numpy";
        assert!(PipInstaller::is_index_fallback(stderr));

        let stderr = "ERROR: No matching distribution found for torch";
        assert!(PipInstaller::is_index_fallback(stderr));

        let stderr = "ERROR: wheel is invalid";
        assert!(!PipInstaller::is_index_fallback(stderr));
    }
}
