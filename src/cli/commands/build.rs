//! Build command - warm the cache, build the wheel, stage it

use crate::cli::args::BuildArgs;
use crate::cli::commands::{open_store, resolve_staging_dir, resolve_workspace_root};
use crate::config::Config;
use crate::error::WwResult;
use crate::pipeline::{BuildParams, BuildPipeline, StageOutcome};
use crate::toolchain::{CargoCompiler, MaturinBuilder};
use crate::ui::{self, UiContext};
use crate::workspace::UnitSelector;
use tracing::debug;

/// Execute the build command
pub async fn execute(args: BuildArgs, config: &Config) -> WwResult<()> {
    let ctx = UiContext::detect();
    let workspace_root = resolve_workspace_root(&args.workspace)?;
    let staging_dir = resolve_staging_dir(&args.staging, &workspace_root, config);
    let store = open_store(config);
    debug!("Store root: {}", store.root().display());

    let selector = UnitSelector {
        package: args.package.clone(),
        manifest_path: args.manifest_path.clone(),
    };
    let frozen = config.build.frozen && !args.no_frozen;

    let params = BuildParams {
        workspace_root: workspace_root.clone(),
        selector,
        frozen,
        strip: config.build.strip,
        manylinux: config.build.manylinux.clone(),
        staging_dir,
        fresh_staging: args.fresh_staging,
        warm_all: args.warm_all,
    };

    let compiler = CargoCompiler::with_program(config.build.cargo.as_str());
    let builder = MaturinBuilder::with_program(config.build.maturin.as_str());
    let pipeline = BuildPipeline::new(&store, &compiler, &builder);

    ui::intro(&ctx, "Wheelwright Build");
    if !frozen {
        ui::step_warn_hint(
            &ctx,
            "Lockfile updates are allowed for this run",
            "the cache key differs from frozen builds",
        );
    }
    let mut spinner = ui::TaskSpinner::new(&ctx);
    spinner.start("Warming workspace cache...");

    let report = match pipeline.run_build(&params).await {
        Ok(report) => report,
        Err(e) => {
            spinner.stop_error("Build failed");
            return Err(e);
        }
    };
    spinner.stop("Pipeline complete");

    for stage in &report.stages {
        let label = match stage.outcome {
            StageOutcome::CacheHit => format!("{} stage: cache hit", stage.stage),
            StageOutcome::Ran => format!("{} stage: ran", stage.stage),
        };
        ui::step_ok_detail(&ctx, &label, &format!("{} ms", stage.elapsed_ms));
    }
    ui::step_info(&ctx, &format!("Workspace hash: {}", report.workspace_hash));

    if let Some(wheel) = &report.wheel {
        ui::outro_success(&ctx, &format!("Staged {}", wheel.display()));
    }
    Ok(())
}
