//! Tool trait definitions and request types

use crate::error::WwResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Captured output of one external tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit code (-1 if terminated by signal)
    pub code: i32,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the invocation succeeded
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Parameters for building one unit into a wheel
#[derive(Debug, Clone)]
pub struct WheelRequest {
    /// Package name of the unit
    pub unit: String,
    /// Absolute path to the unit's Cargo.toml
    pub manifest_path: PathBuf,
    /// Directory the builder writes the wheel into
    pub out_dir: PathBuf,
    /// Strip symbols from the native library
    pub strip: bool,
    /// Forbid lockfile mutation during the build
    pub frozen: bool,
    /// Portability policy value for `--manylinux` (normally "off")
    pub manylinux: String,
}

/// Parameters for installing a staged wheel
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// The wheel file to install
    pub wheel: PathBuf,
    /// Local directory pip may resolve additional wheels from
    pub find_links: PathBuf,
    /// Install prefix for the resulting package tree
    pub prefix: PathBuf,
}

/// Compiles a cargo workspace, warming the shared build cache
#[async_trait]
pub trait WorkspaceCompiler: Send + Sync {
    /// Check the tool is installed and responding
    async fn is_available(&self) -> bool;

    /// Full version string from the tool
    async fn version(&self) -> WwResult<String>;

    /// Compile the workspace (or one named unit) in release mode.
    ///
    /// With `frozen` set the lockfile must not be updated; an out-of-date
    /// lock fails with `LockMismatch` rather than being rewritten.
    async fn compile(&self, workspace_root: &Path, unit: Option<&str>, frozen: bool)
        -> WwResult<()>;
}

/// Builds exactly one unit into a native-extension wheel
#[async_trait]
pub trait WheelBuilder: Send + Sync {
    /// Check the tool is installed and responding
    async fn is_available(&self) -> bool;

    /// Full version string from the tool
    async fn version(&self) -> WwResult<String>;

    /// Build the wheel and return its path inside `req.out_dir`.
    ///
    /// Exactly one wheel must result; zero or several is an error.
    async fn build(&self, req: &WheelRequest) -> WwResult<PathBuf>;
}

/// Installs a wheel into a prefix without any network access
#[async_trait]
pub trait WheelInstaller: Send + Sync {
    /// Check the tool is installed and responding
    async fn is_available(&self) -> bool;

    /// Full version string from the tool
    async fn version(&self) -> WwResult<String>;

    /// Install the wheel offline. Any attempt to reach a remote index
    /// fails with `NetworkFallbackForbidden`.
    async fn install(&self, req: &InstallRequest) -> WwResult<()>;
}
