//! Workspace content hashing
//!
//! Produces the deterministic key used to address the shared artifact
//! store: SHA-256 over every tracked file (path + contents) in sorted
//! order, plus the lock-freezing policy. A frozen and a non-frozen build
//! of the same tree get different keys on purpose.

use crate::error::{WheelwrightError, WwResult};
use crate::workspace::Workspace;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names tracked in addition to Rust sources
const TRACKED_NAMES: &[&str] = &["Cargo.toml", "Cargo.lock", "pyproject.toml"];

/// Directories never descended into
const SKIPPED_DIRS: &[&str] = &["target", "dist", "__pycache__"];

/// Compute the content hash for a workspace under a given lock policy.
///
/// Returns the first 16 hex chars of the SHA-256 digest.
pub fn content_hash(workspace: &Workspace, frozen: bool) -> WwResult<String> {
    let mut files = Vec::new();
    collect_tracked(&workspace.root, &workspace.root, &mut files)?;
    files.sort();

    let mut hasher = Sha256::new();
    let policy: &[u8] = if frozen { b"lock:frozen\n" } else { b"lock:loose\n" };
    hasher.update(policy);

    for rel in &files {
        let contents = fs::read(workspace.root.join(rel)).map_err(|e| {
            WheelwrightError::io(format!("hashing {}", rel.display()), e)
        })?;
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        hasher.update(&contents);
        hasher.update([0u8]);
    }

    let hash = hex::encode(&hasher.finalize()[..8]);
    debug!(
        "Workspace {} hashes to {} ({} files, frozen={})",
        workspace.root.display(),
        hash,
        files.len(),
        frozen
    );
    Ok(hash)
}

fn is_tracked(path: &Path) -> bool {
    if path.extension().is_some_and(|e| e == "rs") {
        return true;
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| TRACKED_NAMES.contains(&n))
}

fn collect_tracked(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> WwResult<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| WheelwrightError::io(format!("listing {}", dir.display()), e))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| WheelwrightError::io(format!("listing {}", dir.display()), e))?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            collect_tracked(root, &path, out)?;
        } else if is_tracked(&path) {
            // Safe: path is always under root
            let rel = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            out.push(rel);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace_fixture() -> (TempDir, Workspace) {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            "[package]\nname = \"core\"\nversion = \"1.0.0\"\n",
        )
        .unwrap();
        fs::write(temp.path().join("Cargo.lock"), "# lock v1\n").unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/lib.rs"), "pub fn core() {}\n").unwrap();
        let ws = Workspace::discover(temp.path()).unwrap();
        (temp, ws)
    }

    #[test]
    fn hash_is_deterministic() {
        let (_temp, ws) = workspace_fixture();
        let h1 = content_hash(&ws, true).unwrap();
        let h2 = content_hash(&ws, true).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 16);
    }

    #[test]
    fn source_change_changes_hash() {
        let (temp, ws) = workspace_fixture();
        let before = content_hash(&ws, true).unwrap();

        fs::write(temp.path().join("src/lib.rs"), "pub fn core2() {}\n").unwrap();
        let after = content_hash(&ws, true).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn lock_change_changes_hash() {
        let (temp, ws) = workspace_fixture();
        let before = content_hash(&ws, true).unwrap();

        fs::write(temp.path().join("Cargo.lock"), "# lock v2\n").unwrap();
        let after = content_hash(&ws, true).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn lock_policy_changes_hash() {
        let (_temp, ws) = workspace_fixture();
        let frozen = content_hash(&ws, true).unwrap();
        let loose = content_hash(&ws, false).unwrap();
        assert_ne!(frozen, loose);
    }

    #[test]
    fn target_dir_ignored() {
        let (temp, ws) = workspace_fixture();
        let before = content_hash(&ws, true).unwrap();

        fs::create_dir_all(temp.path().join("target/release")).unwrap();
        fs::write(temp.path().join("target/release/build.rs"), "junk").unwrap();
        let after = content_hash(&ws, true).unwrap();

        assert_eq!(before, after);
    }
}
