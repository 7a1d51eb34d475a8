//! Configuration schema for wheelwright
//!
//! Global configuration lives at `~/.config/wheelwright/config.toml`;
//! a project-local `.wheelwright.toml` overrides it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Artifact store settings
    pub cache: CacheConfig,

    /// Wheel build settings
    pub build: BuildConfig,

    /// Offline install settings
    pub install: InstallConfig,

    /// Downstream composition settings
    pub compose: ComposeConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Artifact store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Store root (defaults to the platform cache dir)
    pub dir: Option<PathBuf>,

    /// Entries older than this are eligible for `cache gc`
    pub max_age_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_age_days: 30,
        }
    }
}

/// Wheel build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Forbid lockfile mutation during builds
    pub frozen: bool,

    /// Strip symbols from built extensions
    pub strip: bool,

    /// `--manylinux` portability policy ("off" trades portability for
    /// determinism when build and install share one environment)
    pub manylinux: String,

    /// Staging directory, relative to the workspace root
    pub staging_dir: PathBuf,

    /// Cargo binary to use
    pub cargo: String,

    /// Maturin binary to use
    pub maturin: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            frozen: true,
            strip: true,
            manylinux: "off".to_string(),
            staging_dir: PathBuf::from("dist/staging"),
            cargo: "cargo".to_string(),
            maturin: "maturin".to_string(),
        }
    }
}

/// Offline install configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Pip binary to use
    pub pip: String,

    /// Default install prefix (required on the command line if unset)
    pub prefix: Option<PathBuf>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            pip: "pip".to_string(),
            prefix: None,
        }
    }
}

/// Downstream composition configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Third-party dependency names, in declaration order
    pub dependencies: Vec<String>,

    /// Path to the downstream package's pyproject.toml
    pub pyproject: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_reproducibility_first() {
        let config = Config::default();
        assert!(config.build.frozen);
        assert!(config.build.strip);
        assert_eq!(config.build.manylinux, "off");
        assert_eq!(config.cache.max_age_days, 30);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[build]\nfrozen = false\n").unwrap();
        assert!(!config.build.frozen);
        assert!(config.build.strip);
        assert_eq!(config.install.pip, "pip");
    }

    #[test]
    fn roundtrip() {
        let mut config = Config::default();
        config.compose.dependencies = vec!["numpy".into(), "torch".into()];

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.compose.dependencies, vec!["numpy", "torch"]);
    }
}
