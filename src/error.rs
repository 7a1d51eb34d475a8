//! Error types for wheelwright
//!
//! All modules use `WwResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wheelwright operations
pub type WwResult<T> = Result<T, WheelwrightError>;

/// Pipeline stage an error is attributed to, for failure reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Workspace build cache (warm) stage
    Warm,
    /// Native-extension wheel build stage
    Build,
    /// Artifact staging stage
    Staging,
    /// Offline install stage
    Install,
    /// Downstream manifest composition stage
    Compose,
}

impl Stage {
    /// Human-readable stage name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Build => "build",
            Self::Staging => "staging",
            Self::Install => "install",
            Self::Compose => "compose",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// All errors that can occur in wheelwright
#[derive(Error, Debug)]
pub enum WheelwrightError {
    // Workspace / lock errors
    #[error("No Cargo.lock found at {0}. The workspace lock must be committed and frozen.")]
    LockMissing(PathBuf),

    #[error("Lockfile is out of date for {workspace}: {detail}")]
    LockMismatch { workspace: PathBuf, detail: String },

    #[error("Workspace compile failed: {detail}")]
    CompileError { detail: String },

    #[error("Invalid workspace manifest at {path}: {reason}")]
    WorkspaceInvalid { path: PathBuf, reason: String },

    // Selector errors
    #[error("No workspace member matches selector '{0}'")]
    SelectorNotFound(String),

    #[error("Selector '{selector}' is ambiguous: matches {matches:?}")]
    SelectorAmbiguous {
        selector: String,
        matches: Vec<String>,
    },

    // Builder errors
    #[error("Wheel build failed for {unit}: {detail}")]
    BuildFailed { unit: String, detail: String },

    #[error("Staging directory {dir} already contains {artifact} from a prior run")]
    StagingConflict { dir: PathBuf, artifact: String },

    #[error("No wheel artifact found in {0}")]
    NoArtifact(PathBuf),

    #[error("Expected exactly one wheel in {dir}, found {count}")]
    MultipleArtifacts { dir: PathBuf, count: usize },

    // Installer / composer errors
    #[error("Install would fall back to a remote index: {detail}")]
    NetworkFallbackForbidden { detail: String },

    #[error("Native dependency '{name}' does not resolve to a locally built wheel")]
    DependencyUnresolvable { name: String },

    // Cache store errors
    #[error("Cache entry {key} is corrupt: {reason}")]
    CacheEntryCorrupt { key: String, reason: String },

    // Tool errors
    #[error("Required tool not found: {name}. {hint}")]
    ToolNotFound { name: String, hint: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML edit error: {0}")]
    TomlEdit(#[from] toml_edit::TomlError),

    // General errors
    #[error("{0}")]
    User(String),
}

impl WheelwrightError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Which pipeline stage this error belongs to, if it is stage-specific
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::LockMissing(_) | Self::LockMismatch { .. } | Self::CompileError { .. } => {
                Some(Stage::Warm)
            }
            Self::SelectorNotFound(_)
            | Self::SelectorAmbiguous { .. }
            | Self::BuildFailed { .. } => Some(Stage::Build),
            Self::StagingConflict { .. }
            | Self::NoArtifact(_)
            | Self::MultipleArtifacts { .. } => Some(Stage::Staging),
            Self::NetworkFallbackForbidden { .. } => Some(Stage::Install),
            Self::DependencyUnresolvable { .. } => Some(Stage::Compose),
            _ => None,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::LockMissing(_) => Some("Run: cargo generate-lockfile, then commit Cargo.lock"),
            Self::LockMismatch { .. } => {
                Some("Update the lock deliberately with: cargo update, then re-run")
            }
            Self::StagingConflict { .. } => {
                Some("Re-run with --fresh-staging to clear stale artifacts")
            }
            Self::DependencyUnresolvable { .. } => Some("Run: wheelwright build"),
            Self::NetworkFallbackForbidden { .. } => {
                Some("Stage all required wheels locally; remote indexes are disabled")
            }
            _ => None,
        }
    }
}
