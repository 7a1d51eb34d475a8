//! Install command - offline install of the staged wheel

use crate::cli::args::InstallArgs;
use crate::cli::commands::{resolve_staging_dir, resolve_workspace_root};
use crate::config::Config;
use crate::error::{WheelwrightError, WwResult};
use crate::pipeline::run_install;
use crate::toolchain::PipInstaller;
use crate::ui::{self, UiContext};

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config) -> WwResult<()> {
    let ctx = UiContext::detect();
    let workspace_root = resolve_workspace_root(&args.workspace)?;
    let staging_dir = resolve_staging_dir(&args.staging, &workspace_root, config);

    let prefix = args
        .prefix
        .clone()
        .or_else(|| config.install.prefix.clone())
        .ok_or_else(|| {
            WheelwrightError::User(
                "No install prefix. Pass --prefix or set install.prefix in config.".to_string(),
            )
        })?;

    let installer = PipInstaller::with_program(config.install.pip.as_str());

    ui::intro(&ctx, "Wheelwright Install");
    let mut spinner = ui::TaskSpinner::new(&ctx);
    spinner.start("Installing staged wheel (offline)...");

    let report = match run_install(&installer, &staging_dir, &prefix).await {
        Ok(report) => report,
        Err(e) => {
            spinner.stop_error("Install failed");
            return Err(e);
        }
    };
    spinner.stop("Install complete");

    if let Some(wheel) = &report.wheel {
        ui::step_ok_detail(
            &ctx,
            "Installed",
            &wheel
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }
    ui::outro_success(&ctx, &format!("Package tree at {}", prefix.display()));
    Ok(())
}
