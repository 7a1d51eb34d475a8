//! Downstream dependency composition
//!
//! Rewrites a pure-Python package's `pyproject.toml` so its dependency
//! list carries the declared third-party set plus the locally built
//! native-extension wheel as a direct `file://` reference. The native
//! dependency must resolve to a local build - never a registry lookup.

use crate::cache::{ArtifactStore, EntryKind};
use crate::error::{WheelwrightError, WwResult};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{Array, DocumentMut, Item, Value};
use tracing::{debug, info};

/// Ordered, de-duplicated set of third-party dependency names.
///
/// Declaration order is preserved so the composed manifest is
/// deterministic run to run.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    names: Vec<String>,
}

impl DependencySet {
    /// Build from declared names, dropping duplicates but keeping order
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Self { names: out }
    }

    /// The declared names, in order
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Normalize a Python distribution name per PEP 503
fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == '.' { '-' } else { c })
        .collect()
}

/// Distribution name and version from a standard wheel filename
/// (`{dist}-{version}-{python}-{abi}-{platform}.whl`).
pub fn parse_wheel_filename(path: &Path) -> Option<(String, String)> {
    let stem = path.file_name()?.to_str()?.strip_suffix(".whl")?;
    let mut parts = stem.split('-');
    let dist = parts.next()?.to_string();
    let version = parts.next()?.to_string();
    // python/abi/platform tags must be present for this to be a wheel name
    if parts.next().is_none() {
        return None;
    }
    Some((dist, version))
}

/// Resolve the native-extension wheel for `package`.
///
/// Staging wins when it holds a matching wheel; otherwise the newest
/// matching store entry is used. No local build anywhere means the
/// compose step cannot proceed.
pub fn resolve_native_wheel(
    package: &str,
    staging_dir: Option<&Path>,
    store: &ArtifactStore,
) -> WwResult<PathBuf> {
    let wanted = normalize(package);

    if let Some(dir) = staging_dir {
        if dir.is_dir() {
            if let Some(wheel) = wheels_in(dir)?
                .into_iter()
                .find(|w| wheel_matches(w, &wanted))
            {
                debug!("Native wheel for {} resolved from staging", package);
                return Ok(wheel);
            }
        }
    }

    for entry in store.entries()? {
        if entry.meta.kind != EntryKind::Wheel {
            continue;
        }
        let matches_pkg = entry
            .meta
            .package
            .as_deref()
            .is_some_and(|p| normalize(p) == wanted);
        if !matches_pkg {
            continue;
        }
        if let Some(wheel) = entry.wheel_path() {
            if wheel.exists() {
                debug!("Native wheel for {} resolved from store", package);
                return Ok(wheel);
            }
        }
    }

    Err(WheelwrightError::DependencyUnresolvable {
        name: package.to_string(),
    })
}

fn wheel_matches(wheel: &Path, wanted: &str) -> bool {
    parse_wheel_filename(wheel).is_some_and(|(dist, _)| normalize(&dist) == *wanted)
}

fn wheels_in(dir: &Path) -> WwResult<Vec<PathBuf>> {
    let read = fs::read_dir(dir)
        .map_err(|e| WheelwrightError::io(format!("listing {}", dir.display()), e))?;
    Ok(read
        .filter_map(|r| r.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "whl"))
        .collect())
}

/// Rewrite `[project].dependencies` in a downstream `pyproject.toml`.
///
/// Third-party names keep their declared order; the native wheel is
/// appended last as `dist @ file://<abs path>`. All other manifest
/// content and formatting is preserved.
pub fn compose_manifest(
    pyproject: &Path,
    third_party: &DependencySet,
    native_wheel: &Path,
) -> WwResult<()> {
    let content = fs::read_to_string(pyproject)
        .map_err(|e| WheelwrightError::io(format!("reading {}", pyproject.display()), e))?;
    let mut doc: DocumentMut = content.parse()?;

    let (dist, _version) = parse_wheel_filename(native_wheel).ok_or_else(|| {
        WheelwrightError::DependencyUnresolvable {
            name: native_wheel.display().to_string(),
        }
    })?;

    let wheel_abs = native_wheel
        .canonicalize()
        .map_err(|e| WheelwrightError::io(format!("resolving {}", native_wheel.display()), e))?;

    let mut deps = Array::new();
    for name in third_party.names() {
        deps.push(name.as_str());
    }
    deps.push(format!("{} @ file://{}", dist, wheel_abs.display()));
    // One dependency per line keeps diffs reviewable
    for item in deps.iter_mut() {
        item.decor_mut().set_prefix("\n    ");
    }
    deps.set_trailing("\n");
    deps.set_trailing_comma(true);

    doc["project"]["dependencies"] = Item::Value(Value::Array(deps));

    fs::write(pyproject, doc.to_string())
        .map_err(|e| WheelwrightError::io(format!("writing {}", pyproject.display()), e))?;

    info!(
        "Composed {} dependencies into {}",
        third_party.names().len() + 1,
        pyproject.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EntryId, EntryMeta};
    use tempfile::TempDir;

    #[test]
    fn dependency_set_dedups_preserving_order() {
        let set = DependencySet::new(
            ["torch", "numpy", "torch", "tqdm"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(set.names(), &["torch", "numpy", "tqdm"]);
    }

    #[test]
    fn wheel_filename_parsing() {
        let path = Path::new("vector_core-1.2.0-cp312-cp312-linux_x86_64.whl");
        let (dist, version) = parse_wheel_filename(path).unwrap();
        assert_eq!(dist, "vector_core");
        assert_eq!(version, "1.2.0");

        assert!(parse_wheel_filename(Path::new("not-a-wheel.txt")).is_none());
        assert!(parse_wheel_filename(Path::new("short.whl")).is_none());
    }

    #[test]
    fn name_normalization_matches_underscore_wheels() {
        assert_eq!(normalize("Vector_Core"), "vector-core");
        assert_eq!(normalize("vector.core"), "vector-core");
    }

    #[test]
    fn unresolvable_without_any_build() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("store"));

        let err = resolve_native_wheel("core", None, &store).unwrap_err();
        assert!(matches!(err, WheelwrightError::DependencyUnresolvable { .. }));
    }

    #[test]
    fn staging_wins_over_store() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("store"));

        let staged = temp.path().join("staging");
        fs::create_dir_all(&staged).unwrap();
        let wheel = staged.join("core-1.0.0-cp312-cp312-linux_x86_64.whl");
        fs::write(&wheel, "w").unwrap();

        let found = resolve_native_wheel("core", Some(&staged), &store).unwrap();
        assert_eq!(found, wheel);
    }

    #[test]
    fn store_fallback_resolves() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("store"));
        let wheel = temp.path().join("core-1.0.0-cp312-cp312-linux_x86_64.whl");
        fs::write(&wheel, "w").unwrap();

        let id = EntryId::wheel("abcd", "core");
        store
            .publish(&id, EntryMeta::new(&id, true).with_package("core"), &[wheel])
            .unwrap();

        let found = resolve_native_wheel("core", None, &store).unwrap();
        assert!(found.exists());
    }

    #[test]
    fn compose_rewrites_dependencies_only() {
        let temp = TempDir::new().unwrap();
        let pyproject = temp.path().join("pyproject.toml");
        fs::write(
            &pyproject,
            r#"# build config
[build-system]
requires = ["setuptools"]

[project]
name = "vectorlink"
version = "0.2.0"
dependencies = ["old-dep"]
"#,
        )
        .unwrap();

        let wheel = temp.path().join("vector_core-1.0.0-cp312-cp312-linux_x86_64.whl");
        fs::write(&wheel, "w").unwrap();

        let deps = DependencySet::new(["numpy", "torch"].into_iter().map(String::from));
        compose_manifest(&pyproject, &deps, &wheel).unwrap();

        let content = fs::read_to_string(&pyproject).unwrap();
        assert!(content.contains("# build config"));
        assert!(content.contains("\"numpy\""));
        assert!(content.contains("\"torch\""));
        assert!(content.contains("vector_core @ file://"));
        assert!(!content.contains("old-dep"));

        // numpy declared before torch, native ref last
        let numpy = content.find("numpy").unwrap();
        let torch = content.find("torch").unwrap();
        let native = content.find("vector_core @").unwrap();
        assert!(numpy < torch && torch < native);
    }
}
