//! Configuration management for wheelwright

pub mod schema;

pub use schema::Config;

use crate::error::{WheelwrightError, WwResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Project-local config file name, discovered upward from the cwd
pub const LOCAL_CONFIG_NAME: &str = ".wheelwright.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wheelwright")
            .join("config.toml")
    }

    /// Walk upward from `start` looking for a project-local config
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        let mut dir = Some(start);
        while let Some(d) = dir {
            let candidate = d.join(LOCAL_CONFIG_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            dir = d.parent();
        }
        None
    }

    /// Load configuration, using defaults when the file is absent
    pub async fn load(&self) -> WwResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }
        let value = Self::read_value(&self.config_path).await?;
        Self::from_value(value, &self.config_path)
    }

    /// Load global config with a project-local overlay merged over it.
    ///
    /// The merge is table-deep: every key set locally wins, everything
    /// else keeps its global (or default) value.
    pub async fn load_merged(&self, local: Option<&Path>) -> WwResult<Config> {
        let mut value = if self.config_path.exists() {
            Self::read_value(&self.config_path).await?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        if let Some(local_path) = local {
            let overlay = Self::read_value(local_path).await?;
            debug!("Merging local config {}", local_path.display());
            merge_values(&mut value, overlay);
        }

        Self::from_value(value, &self.config_path)
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> WwResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            WheelwrightError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    async fn read_value(path: &Path) -> WwResult<toml::Value> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| WheelwrightError::io(format!("reading config from {}", path.display()), e))?;
        content
            .parse::<toml::Value>()
            .map_err(|e| WheelwrightError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn from_value(value: toml::Value, path: &Path) -> WwResult<Config> {
        value
            .try_into()
            .map_err(|e: toml::de::Error| WheelwrightError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    async fn ensure_config_dir(&self) -> WwResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| WheelwrightError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep-merge `overlay` into `base`: tables recurse, scalars replace
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base_slot, other) => *base_slot = other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("nonexistent.toml"));

        let config = manager.load().await.unwrap();
        assert!(config.build.frozen);
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));

        let mut config = Config::default();
        config.install.pip = "pip3".to_string();

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.install.pip, "pip3");
    }

    #[tokio::test]
    async fn local_overlay_wins_per_key() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("config.toml");
        std::fs::write(&global, "[build]\nstrip = false\nmanylinux = \"2014\"\n").unwrap();

        let local = temp.path().join(LOCAL_CONFIG_NAME);
        std::fs::write(&local, "[build]\nmanylinux = \"off\"\n").unwrap();

        let manager = ConfigManager::with_path(global);
        let config = manager.load_merged(Some(&local)).await.unwrap();

        // Local key wins, untouched global key survives, defaults fill the rest
        assert_eq!(config.build.manylinux, "off");
        assert!(!config.build.strip);
        assert!(config.build.frozen);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[build]\nfrozen = \"maybe\"\n").unwrap();

        let manager = ConfigManager::with_path(path);
        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, WheelwrightError::ConfigInvalid { .. }));
    }

    #[test]
    fn find_local_config_walks_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(LOCAL_CONFIG_NAME), "").unwrap();
        let nested = temp.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let found = ConfigManager::find_local_config(&nested).unwrap();
        assert_eq!(found, temp.path().join(LOCAL_CONFIG_NAME));
    }
}
