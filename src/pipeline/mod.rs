//! Linear build pipeline
//!
//! Warm -> Build -> Stage (and, per invocation, Install). Stages run in
//! order, each consuming the previous stage's output; the first failure
//! aborts the run. There is no resumable state: a stage either completes
//! or the pipeline reports which stage failed and why.
//!
//! The shared store short-circuits work: a workspace receipt hit skips
//! compilation entirely, a wheel hit skips the builder and copies the
//! cached artifact into staging.

use crate::cache::{ArtifactStore, EntryId, EntryMeta, StoredEntry};
use crate::error::{Stage, WheelwrightError, WwResult};
use crate::stage::StagingArea;
use crate::toolchain::{InstallRequest, WheelBuilder, WheelInstaller, WheelRequest, WorkspaceCompiler};
use crate::workspace::{content_hash, UnitSelector, Workspace};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// How a stage concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage did its work
    Ran,
    /// A store hit made the work unnecessary
    CacheHit,
}

/// Record of one completed stage
#[derive(Debug, Clone)]
pub struct StageReport {
    /// Which stage
    pub stage: Stage,
    /// How it concluded
    pub outcome: StageOutcome,
    /// Wall time in milliseconds
    pub elapsed_ms: u64,
}

/// Summary of a whole pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Per-stage records, in execution order
    pub stages: Vec<StageReport>,
    /// Workspace content hash the run was keyed by
    pub workspace_hash: String,
    /// The staged wheel, when the run produced one
    pub wheel: Option<PathBuf>,
}

impl PipelineReport {
    fn record(&mut self, stage: Stage, outcome: StageOutcome, started: Instant) {
        self.stages.push(StageReport {
            stage,
            outcome,
            elapsed_ms: started.elapsed().as_millis() as u64,
        });
    }

    /// Outcome of a given stage, if it ran
    pub fn outcome(&self, stage: Stage) -> Option<StageOutcome> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.outcome)
    }
}

/// Parameters for a build run (warm + build + stage)
#[derive(Debug, Clone)]
pub struct BuildParams {
    /// Workspace root directory
    pub workspace_root: PathBuf,
    /// Which unit to build into a wheel
    pub selector: UnitSelector,
    /// Forbid lockfile mutation (part of the cache key)
    pub frozen: bool,
    /// Strip symbols from the built extension
    pub strip: bool,
    /// `--manylinux` policy value, normally "off"
    pub manylinux: String,
    /// Directory to stage the built wheel into
    pub staging_dir: PathBuf,
    /// Clear stale staged wheels instead of failing
    pub fresh_staging: bool,
    /// Warm the whole workspace rather than just the selected unit
    pub warm_all: bool,
}

/// Drives the build stages against pluggable tool implementations
pub struct BuildPipeline<'a> {
    store: &'a ArtifactStore,
    compiler: &'a dyn WorkspaceCompiler,
    builder: &'a dyn WheelBuilder,
}

impl<'a> BuildPipeline<'a> {
    /// Assemble a pipeline over a store and tool seams
    pub fn new(
        store: &'a ArtifactStore,
        compiler: &'a dyn WorkspaceCompiler,
        builder: &'a dyn WheelBuilder,
    ) -> Self {
        Self {
            store,
            compiler,
            builder,
        }
    }

    /// Run warm -> build -> stage for one unit.
    ///
    /// The selector is resolved and the staging directory probed before
    /// anything compiles, so selector errors and staging conflicts never
    /// cost a build.
    pub async fn run_build(&self, params: &BuildParams) -> WwResult<PipelineReport> {
        let workspace = Workspace::discover(&params.workspace_root)?;
        let unit = params.selector.resolve(&workspace)?.clone();
        let area = StagingArea::prepare(&params.staging_dir, params.fresh_staging)?;
        let hash = content_hash(&workspace, params.frozen)?;

        let mut report = PipelineReport {
            workspace_hash: hash.clone(),
            ..Default::default()
        };

        // Warm: ensure the workspace compiled cleanly under this key
        let started = Instant::now();
        let warm_id = EntryId::workspace(&hash);
        if self.store.lookup(&warm_id)?.is_some() {
            debug!("Warm stage: receipt hit for {}", hash);
            report.record(Stage::Warm, StageOutcome::CacheHit, started);
        } else {
            let warm_unit = if params.warm_all {
                None
            } else {
                Some(unit.name.as_str())
            };
            self.compiler
                .compile(&workspace.root, warm_unit, params.frozen)
                .await?;

            let units = if params.warm_all {
                workspace.members.iter().map(|m| m.name.clone()).collect()
            } else {
                vec![unit.name.clone()]
            };
            let toolchain = self.compiler.version().await.ok();
            let mut meta = EntryMeta::new(&warm_id, params.frozen)
                .with_units(units)
                .with_wall_ms(started.elapsed().as_millis() as u64);
            meta.toolchain = toolchain;
            self.store.publish(&warm_id, meta, &[])?;
            report.record(Stage::Warm, StageOutcome::Ran, started);
        }

        // Build: produce (or retrieve) the wheel for this unit
        let started = Instant::now();
        let wheel_id = EntryId::wheel(&hash, &unit.name);
        let entry = match self.store.lookup(&wheel_id)? {
            Some(entry) => {
                debug!("Build stage: wheel hit for {}", wheel_id.key);
                report.record(Stage::Build, StageOutcome::CacheHit, started);
                entry
            }
            None => {
                let entry = self
                    .build_and_publish(&wheel_id, &unit.name, &unit.manifest_path, params)
                    .await?;
                report.record(Stage::Build, StageOutcome::Ran, started);
                entry
            }
        };

        let cached_wheel = entry.wheel_path().ok_or_else(|| {
            WheelwrightError::CacheEntryCorrupt {
                key: wheel_id.key.clone(),
                reason: "wheel entry holds no wheel file".to_string(),
            }
        })?;

        // Stage: exactly one artifact lands in the staging directory
        let started = Instant::now();
        let staged = area.adopt(&cached_wheel)?;
        area.sole_artifact()?;
        report.record(Stage::Staging, StageOutcome::Ran, started);

        info!("Staged {}", staged.display());
        report.wheel = Some(staged);
        Ok(report)
    }

    async fn build_and_publish(
        &self,
        wheel_id: &EntryId,
        unit: &str,
        manifest_path: &std::path::Path,
        params: &BuildParams,
    ) -> WwResult<StoredEntry> {
        let started = Instant::now();
        let out_dir = std::env::temp_dir().join(format!("wheelwright-build-{}", Uuid::new_v4()));

        let request = WheelRequest {
            unit: unit.to_string(),
            manifest_path: manifest_path.to_path_buf(),
            out_dir: out_dir.clone(),
            strip: params.strip,
            frozen: params.frozen,
            manylinux: params.manylinux.clone(),
        };

        let result = self.builder.build(&request).await;
        let entry = match result {
            Ok(wheel) => {
                let meta = EntryMeta::new(wheel_id, params.frozen)
                    .with_package(unit)
                    .with_wall_ms(started.elapsed().as_millis() as u64);
                self.store.publish(wheel_id, meta, &[wheel])
            }
            Err(e) => Err(e),
        };

        // Builder scratch space is not the artifact of record
        let _ = std::fs::remove_dir_all(&out_dir);
        entry
    }
}

/// Run the install stage: the staged wheel goes into `prefix`, offline.
pub async fn run_install(
    installer: &dyn WheelInstaller,
    staging_dir: &std::path::Path,
    prefix: &std::path::Path,
) -> WwResult<PipelineReport> {
    let started = Instant::now();
    let area = StagingArea::open(staging_dir)?;
    let wheel = area.sole_artifact()?;

    installer
        .install(&InstallRequest {
            wheel: wheel.clone(),
            find_links: staging_dir.to_path_buf(),
            prefix: prefix.to_path_buf(),
        })
        .await?;

    let mut report = PipelineReport {
        wheel: Some(wheel),
        ..Default::default()
    };
    report.record(Stage::Install, StageOutcome::Ran, started);
    Ok(report)
}
