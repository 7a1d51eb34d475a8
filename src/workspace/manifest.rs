//! Workspace manifest parsing
//!
//! Reads the root `Cargo.toml` and resolves each member to its package
//! name, version, and manifest path. Both virtual workspaces and
//! single-package roots are supported.

use crate::error::{WheelwrightError, WwResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root manifest shape - only the fields we need
#[derive(Debug, Deserialize)]
struct RootManifest {
    workspace: Option<WorkspaceSection>,
    package: Option<PackageSection>,
}

#[derive(Debug, Deserialize)]
struct WorkspaceSection {
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: String,
    version: Option<String>,
}

/// Member manifest shape
#[derive(Debug, Deserialize)]
struct MemberManifest {
    package: PackageSection,
}

/// One buildable unit of the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceMember {
    /// Package name from the member's `[package]` section
    pub name: String,
    /// Package version ("0.0.0" if unset, e.g. inherited)
    pub version: String,
    /// Absolute path to the member's Cargo.toml
    pub manifest_path: PathBuf,
    /// Absolute path to the member's directory
    pub dir: PathBuf,
}

/// A discovered cargo workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Workspace root directory
    pub root: PathBuf,
    /// All buildable members, in manifest order
    pub members: Vec<WorkspaceMember>,
    /// Path to the shared Cargo.lock
    pub lockfile: PathBuf,
}

impl Workspace {
    /// Discover a workspace rooted at `root`.
    ///
    /// Fails with `LockMissing` if no `Cargo.lock` is present - all
    /// members must resolve against one shared, committed lock.
    pub fn discover(root: &Path) -> WwResult<Self> {
        let manifest_path = root.join("Cargo.toml");
        if !manifest_path.exists() {
            return Err(WheelwrightError::PathNotFound(manifest_path));
        }

        let content = fs::read_to_string(&manifest_path)
            .map_err(|e| WheelwrightError::io(format!("reading {}", manifest_path.display()), e))?;
        let manifest: RootManifest =
            toml::from_str(&content).map_err(|e| WheelwrightError::WorkspaceInvalid {
                path: manifest_path.clone(),
                reason: e.to_string(),
            })?;

        let lockfile = root.join("Cargo.lock");
        if !lockfile.exists() {
            return Err(WheelwrightError::LockMissing(root.to_path_buf()));
        }

        let members = match (&manifest.workspace, &manifest.package) {
            (Some(ws), _) => resolve_members(root, &ws.members)?,
            (None, Some(pkg)) => vec![WorkspaceMember {
                name: pkg.name.clone(),
                version: pkg.version.clone().unwrap_or_else(|| "0.0.0".to_string()),
                manifest_path: manifest_path.clone(),
                dir: root.to_path_buf(),
            }],
            (None, None) => {
                return Err(WheelwrightError::WorkspaceInvalid {
                    path: manifest_path,
                    reason: "neither [workspace] nor [package] present".to_string(),
                })
            }
        };

        if members.is_empty() {
            return Err(WheelwrightError::WorkspaceInvalid {
                path: manifest_path,
                reason: "workspace has no members".to_string(),
            });
        }

        debug!(
            "Discovered workspace at {} with {} member(s)",
            root.display(),
            members.len()
        );

        Ok(Self {
            root: root.to_path_buf(),
            members,
            lockfile,
        })
    }

    /// Look up a member by package name
    pub fn member(&self, name: &str) -> Option<&WorkspaceMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Expand member entries into concrete directories.
///
/// Literal paths and trailing-`*` globs (e.g. `crates/*`) are supported;
/// that covers the layouts cargo workspaces use in practice.
fn resolve_members(root: &Path, entries: &[String]) -> WwResult<Vec<WorkspaceMember>> {
    let mut dirs = Vec::new();

    for entry in entries {
        if let Some(prefix) = entry.strip_suffix("/*") {
            let parent = root.join(prefix);
            let read = fs::read_dir(&parent)
                .map_err(|e| WheelwrightError::io(format!("listing {}", parent.display()), e))?;
            let mut expanded: Vec<PathBuf> = read
                .filter_map(|r| r.ok())
                .map(|d| d.path())
                .filter(|p| p.join("Cargo.toml").exists())
                .collect();
            expanded.sort();
            dirs.extend(expanded);
        } else {
            dirs.push(root.join(entry));
        }
    }

    dirs.iter().map(|dir| load_member(dir)).collect()
}

fn load_member(dir: &Path) -> WwResult<WorkspaceMember> {
    let manifest_path = dir.join("Cargo.toml");
    let content = fs::read_to_string(&manifest_path)
        .map_err(|e| WheelwrightError::io(format!("reading {}", manifest_path.display()), e))?;
    let manifest: MemberManifest =
        toml::from_str(&content).map_err(|e| WheelwrightError::WorkspaceInvalid {
            path: manifest_path.clone(),
            reason: e.to_string(),
        })?;

    Ok(WorkspaceMember {
        name: manifest.package.name,
        version: manifest
            .package
            .version
            .unwrap_or_else(|| "0.0.0".to_string()),
        manifest_path,
        dir: dir.to_path_buf(),
    })
}
