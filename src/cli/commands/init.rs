//! Init command - create project-local .wheelwright.toml

use crate::cli::args::InitArgs;
use crate::config::LOCAL_CONFIG_NAME;
use crate::error::{WheelwrightError, WwResult};
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::fs;

/// Template for project-local config
const INIT_TEMPLATE: &str = r#"# Wheelwright project configuration
# Settings here override your global config (~/.config/wheelwright/config.toml)

[build]
# frozen = true          # forbid lockfile updates during builds
# strip = true           # strip symbols from built extensions
# manylinux = "off"      # portability shims off for same-host installs
# staging_dir = "dist/staging"

[install]
# pip = "pip"
# prefix = "/opt/myapp"

[compose]
# pyproject = "python/pyproject.toml"
# dependencies = ["numpy", "torch"]
"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> WwResult<()> {
    let ctx = UiContext::detect();

    let target_dir = match args.path {
        Some(ref p) => p.clone(),
        None => std::env::current_dir()
            .map_err(|e| WheelwrightError::io("getting current directory", e))?,
    };

    let config_path = target_dir.join(LOCAL_CONFIG_NAME);

    if config_path.exists() && !args.force {
        return Err(WheelwrightError::User(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        )));
    }

    ensure_dir(&target_dir).await?;

    fs::write(&config_path, INIT_TEMPLATE)
        .await
        .map_err(|e| WheelwrightError::io(format!("writing {}", config_path.display()), e))?;

    ui::step_ok_detail(
        &ctx,
        "Created project config",
        &config_path.display().to_string(),
    );

    Ok(())
}

async fn ensure_dir(dir: &Path) -> WwResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| WheelwrightError::io(format!("creating directory {}", dir.display()), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_creates_config() {
        let temp = TempDir::new().unwrap();
        let args = InitArgs {
            force: false,
            path: Some(temp.path().to_path_buf()),
        };
        execute(args).await.unwrap();

        let content = std::fs::read_to_string(temp.path().join(LOCAL_CONFIG_NAME)).unwrap();
        assert!(content.contains("[build]"));
        assert!(content.contains("[compose]"));
    }

    #[tokio::test]
    async fn init_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(LOCAL_CONFIG_NAME), "existing").unwrap();

        let args = InitArgs {
            force: false,
            path: Some(temp.path().to_path_buf()),
        };
        let err = execute(args).await.unwrap_err();
        assert!(matches!(err, WheelwrightError::User(_)));

        let args = InitArgs {
            force: true,
            path: Some(temp.path().to_path_buf()),
        };
        execute(args).await.unwrap();
        let content = std::fs::read_to_string(temp.path().join(LOCAL_CONFIG_NAME)).unwrap();
        assert!(content.contains("[build]"));
    }
}
