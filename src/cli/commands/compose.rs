//! Compose command - declare dependencies for the downstream package

use crate::cli::args::ComposeArgs;
use crate::cli::commands::{open_store, resolve_staging_dir, resolve_workspace_root};
use crate::compose::{compose_manifest, parse_wheel_filename, resolve_native_wheel, DependencySet};
use crate::config::Config;
use crate::error::{WheelwrightError, WwResult};
use crate::stage::StagingArea;
use crate::ui::{self, UiContext};

/// Execute the compose command
pub async fn execute(args: ComposeArgs, config: &Config) -> WwResult<()> {
    let ctx = UiContext::detect();
    let workspace_root = resolve_workspace_root(&args.workspace)?;
    let staging_dir = resolve_staging_dir(&args.staging, &workspace_root, config);
    let store = open_store(config);

    let pyproject = args
        .pyproject
        .clone()
        .or_else(|| config.compose.pyproject.clone())
        .unwrap_or_else(|| workspace_root.join("pyproject.toml"));
    if !pyproject.is_file() {
        return Err(WheelwrightError::PathNotFound(pyproject));
    }

    let declared = if args.dependency.is_empty() {
        config.compose.dependencies.clone()
    } else {
        args.dependency.clone()
    };
    let deps = DependencySet::new(declared);

    // Package name: explicit flag, else read off the staged wheel
    let package = match &args.package {
        Some(name) => name.clone(),
        None => {
            let staged = StagingArea::open(&staging_dir)
                .and_then(|area| area.sole_artifact())
                .map_err(|_| WheelwrightError::DependencyUnresolvable {
                    name: "<unspecified>".to_string(),
                })?;
            parse_wheel_filename(&staged)
                .map(|(dist, _)| dist)
                .ok_or_else(|| WheelwrightError::DependencyUnresolvable {
                    name: staged.display().to_string(),
                })?
        }
    };

    let wheel = resolve_native_wheel(&package, Some(&staging_dir), &store)?;

    ui::intro(&ctx, "Wheelwright Compose");
    ui::step_ok_detail(&ctx, "Native wheel", &wheel.display().to_string());
    if deps.names().is_empty() {
        ui::step_warn(&ctx, "No third-party dependencies declared");
    }
    for name in deps.names() {
        ui::step_info(&ctx, &format!("Declared dependency: {}", name));
    }

    compose_manifest(&pyproject, &deps, &wheel)?;

    ui::outro_success(&ctx, &format!("Composed {}", pyproject.display()));
    Ok(())
}
