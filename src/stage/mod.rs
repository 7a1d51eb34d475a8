//! Artifact staging
//!
//! The staging directory is the hand-off point between the wheel build
//! and the offline install: after a successful build it holds exactly
//! one wheel. Stale artifacts from unrelated prior runs are never
//! silently installed - they either trigger `StagingConflict` or are
//! cleared explicitly.

use crate::error::{WheelwrightError, WwResult};
use crate::toolchain::sole_wheel_in;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A prepared staging directory
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Prepare a staging directory for a new build.
    ///
    /// Creates the directory if absent. If it already holds a wheel,
    /// `fresh` clears it; otherwise the stale artifact is a
    /// `StagingConflict`.
    pub fn prepare(dir: &Path, fresh: bool) -> WwResult<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| WheelwrightError::io(format!("creating staging {}", dir.display()), e))?;

        let stale = existing_wheels(dir)?;
        if !stale.is_empty() {
            if !fresh {
                let artifact = stale[0]
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                return Err(WheelwrightError::StagingConflict {
                    dir: dir.to_path_buf(),
                    artifact,
                });
            }
            for wheel in &stale {
                warn!("Clearing stale artifact {}", wheel.display());
                fs::remove_file(wheel).map_err(|e| {
                    WheelwrightError::io(format!("removing {}", wheel.display()), e)
                })?;
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Open an existing staging directory without touching its contents
    /// (install path: the build already populated it).
    pub fn open(dir: &Path) -> WwResult<Self> {
        if !dir.is_dir() {
            return Err(WheelwrightError::NoArtifact(dir.to_path_buf()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Copy one built wheel into staging, returning its staged path
    pub fn adopt(&self, wheel: &Path) -> WwResult<PathBuf> {
        let name = wheel
            .file_name()
            .ok_or_else(|| WheelwrightError::PathNotFound(wheel.to_path_buf()))?;
        let dest = self.dir.join(name);
        fs::copy(wheel, &dest)
            .map_err(|e| WheelwrightError::io(format!("staging {}", wheel.display()), e))?;
        debug!("Staged {}", dest.display());
        Ok(dest)
    }

    /// The exactly-one staged wheel; zero or several is an error
    pub fn sole_artifact(&self) -> WwResult<PathBuf> {
        sole_wheel_in(&self.dir)
    }

    /// The staging directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn existing_wheels(dir: &Path) -> WwResult<Vec<PathBuf>> {
    let read = fs::read_dir(dir)
        .map_err(|e| WheelwrightError::io(format!("listing {}", dir.display()), e))?;
    Ok(read
        .filter_map(|r| r.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "whl"))
        .collect())
}
