//! Command implementations

mod build;
mod cache;
mod compose;
mod init;
mod install;
mod status;

pub use build::execute as build;
pub use cache::execute as cache;
pub use compose::execute as compose;
pub use init::execute as init;
pub use install::execute as install;
pub use status::execute as status;

use crate::cache::ArtifactStore;
use crate::config::Config;
use std::path::{Path, PathBuf};

/// Open the artifact store configured for this run
pub(crate) fn open_store(config: &Config) -> ArtifactStore {
    match &config.cache.dir {
        Some(dir) => ArtifactStore::new(dir.clone()),
        None => ArtifactStore::new(ArtifactStore::default_root()),
    }
}

/// Resolve the workspace root: explicit flag or current directory
pub(crate) fn resolve_workspace_root(
    flag: &Option<PathBuf>,
) -> crate::error::WwResult<PathBuf> {
    match flag {
        Some(path) => Ok(path.clone()),
        None => std::env::current_dir()
            .map_err(|e| crate::error::WheelwrightError::io("getting current directory", e)),
    }
}

/// Resolve the staging directory: explicit flag or config-relative
pub(crate) fn resolve_staging_dir(
    flag: &Option<PathBuf>,
    workspace_root: &Path,
    config: &Config,
) -> PathBuf {
    match flag {
        Some(path) => path.clone(),
        None => workspace_root.join(&config.build.staging_dir),
    }
}
