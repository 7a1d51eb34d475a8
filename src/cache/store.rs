//! Artifact store implementation
//!
//! One directory per entry under the store root. `entry.toml` is the
//! publish marker: an entry without it does not exist as far as readers
//! are concerned.

use crate::error::{WheelwrightError, WwResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Name of the per-entry metadata file, written last during publish
const ENTRY_META: &str = "entry.toml";

/// Prefix for in-flight publish directories, skipped by readers
const TMP_PREFIX: &str = ".tmp-";

/// What kind of artifact an entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Receipt that the workspace compiled cleanly under this key
    Workspace,
    /// A built native-extension wheel
    Wheel,
}

impl EntryKind {
    /// Directory-name prefix for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Wheel => "wheel",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses one entry in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryId {
    /// Entry kind
    pub kind: EntryKind,
    /// Content-derived key (workspace hash, plus unit/profile for wheels)
    pub key: String,
}

impl EntryId {
    /// Key for a workspace compile receipt
    pub fn workspace(hash: &str) -> Self {
        Self {
            kind: EntryKind::Workspace,
            key: hash.to_string(),
        }
    }

    /// Key for a built wheel: workspace hash + unit + profile
    pub fn wheel(hash: &str, unit: &str) -> Self {
        Self {
            kind: EntryKind::Wheel,
            key: format!("{}-{}-release", hash, unit),
        }
    }

    /// The entry's directory name under the store root
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.kind.as_str(), self.key)
    }
}

/// Metadata persisted in `entry.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Entry kind
    pub kind: EntryKind,
    /// Content key
    pub key: String,
    /// Package this entry was built for (wheel entries)
    pub package: Option<String>,
    /// Units compiled during the warm stage (workspace receipts)
    #[serde(default)]
    pub units: Vec<String>,
    /// Whether the lock was frozen during the build
    pub frozen: bool,
    /// Toolchain version string (e.g. `cargo 1.82.0`)
    pub toolchain: Option<String>,
    /// Build wall time in milliseconds
    pub wall_ms: Option<u64>,
    /// Artifact files in this entry, relative names
    pub files: Vec<String>,
    /// When the entry was published
    pub created_at: DateTime<Utc>,
}

impl EntryMeta {
    /// Metadata for a new entry published now
    pub fn new(id: &EntryId, frozen: bool) -> Self {
        Self {
            kind: id.kind,
            key: id.key.clone(),
            package: None,
            units: Vec::new(),
            frozen,
            toolchain: None,
            wall_ms: None,
            files: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Attach the package name
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Attach the toolchain version
    pub fn with_toolchain(mut self, toolchain: impl Into<String>) -> Self {
        self.toolchain = Some(toolchain.into());
        self
    }

    /// Attach the units compiled during the warm stage
    pub fn with_units(mut self, units: Vec<String>) -> Self {
        self.units = units;
        self
    }

    /// Attach the build wall time
    pub fn with_wall_ms(mut self, ms: u64) -> Self {
        self.wall_ms = Some(ms);
        self
    }
}

/// A published, immutable store entry
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// Entry address
    pub id: EntryId,
    /// Directory holding the artifacts
    pub path: PathBuf,
    /// Parsed metadata
    pub meta: EntryMeta,
}

impl StoredEntry {
    /// Absolute path of the single wheel in this entry, if any
    pub fn wheel_path(&self) -> Option<PathBuf> {
        self.meta
            .files
            .iter()
            .find(|f| f.ends_with(".whl"))
            .map(|f| self.path.join(f))
    }
}

/// The shared, content-addressed artifact store
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `root` (created lazily on first publish)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default store root.
    ///
    /// `WHEELWRIGHT_STORE` overrides; otherwise the platform cache dir.
    pub fn default_root() -> PathBuf {
        if let Ok(dir) = std::env::var("WHEELWRIGHT_STORE") {
            return PathBuf::from(dir);
        }
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wheelwright")
            .join("store")
    }

    /// The store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a published entry.
    ///
    /// An entry directory without `entry.toml` is treated as absent - the
    /// marker is only ever visible after a completed atomic publish.
    pub fn lookup(&self, id: &EntryId) -> WwResult<Option<StoredEntry>> {
        let dir = self.root.join(id.dir_name());
        let meta_path = dir.join(ENTRY_META);
        if !meta_path.exists() {
            return Ok(None);
        }

        let meta = self.read_meta(&meta_path, &id.key)?;
        Ok(Some(StoredEntry {
            id: id.clone(),
            path: dir,
            meta,
        }))
    }

    /// Publish an entry: copy `files` plus metadata into place atomically.
    ///
    /// Publishing a key that already exists is a no-op returning the
    /// existing entry, so concurrent runs converge on one artifact set.
    pub fn publish(
        &self,
        id: &EntryId,
        mut meta: EntryMeta,
        files: &[PathBuf],
    ) -> WwResult<StoredEntry> {
        if let Some(existing) = self.lookup(id)? {
            debug!("Store entry {} already published", id.dir_name());
            return Ok(existing);
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| WheelwrightError::io(format!("creating store {}", self.root.display()), e))?;

        let tmp = self.root.join(format!("{}{}", TMP_PREFIX, Uuid::new_v4()));
        fs::create_dir(&tmp)
            .map_err(|e| WheelwrightError::io(format!("creating {}", tmp.display()), e))?;

        meta.files = Vec::with_capacity(files.len());
        for file in files {
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| WheelwrightError::PathNotFound(file.clone()))?;
            fs::copy(file, tmp.join(name)).map_err(|e| {
                WheelwrightError::io(format!("copying {} into store", file.display()), e)
            })?;
            meta.files.push(name.to_string());
        }

        // Marker goes in last: visibility of entry.toml == entry published
        let serialized = toml::to_string_pretty(&meta)?;
        fs::write(tmp.join(ENTRY_META), serialized)
            .map_err(|e| WheelwrightError::io("writing entry metadata", e))?;

        let dest = self.root.join(id.dir_name());
        match fs::rename(&tmp, &dest) {
            Ok(()) => {
                info!("Published store entry {}", id.dir_name());
                Ok(StoredEntry {
                    id: id.clone(),
                    path: dest,
                    meta,
                })
            }
            Err(_) if dest.join(ENTRY_META).exists() => {
                // Lost the publish race; adopt the winner's entry
                let _ = fs::remove_dir_all(&tmp);
                debug!("Lost publish race for {}, adopting existing", id.dir_name());
                self.lookup(id)?.ok_or_else(|| WheelwrightError::CacheEntryCorrupt {
                    key: id.key.clone(),
                    reason: "entry vanished after publish race".to_string(),
                })
            }
            Err(e) => {
                let _ = fs::remove_dir_all(&tmp);
                Err(WheelwrightError::io(
                    format!("publishing store entry {}", id.dir_name()),
                    e,
                ))
            }
        }
    }

    /// List all published entries, newest first
    pub fn entries(&self) -> WwResult<Vec<StoredEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        let read = fs::read_dir(&self.root)
            .map_err(|e| WheelwrightError::io(format!("listing {}", self.root.display()), e))?;

        for entry in read.filter_map(|r| r.ok()) {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(TMP_PREFIX) || !entry.path().is_dir() {
                continue;
            }
            let meta_path = entry.path().join(ENTRY_META);
            if !meta_path.exists() {
                continue;
            }
            let meta = self.read_meta(&meta_path, &name)?;
            out.push(StoredEntry {
                id: EntryId {
                    kind: meta.kind,
                    key: meta.key.clone(),
                },
                path: entry.path(),
                meta,
            });
        }

        out.sort_by(|a, b| b.meta.created_at.cmp(&a.meta.created_at));
        Ok(out)
    }

    /// Remove entries older than `max_age_days`. Returns removed keys.
    pub fn gc(&self, max_age_days: u32) -> WwResult<Vec<String>> {
        let cutoff = Utc::now() - Duration::days(i64::from(max_age_days));
        let mut removed = Vec::new();

        for entry in self.entries()? {
            if entry.meta.created_at < cutoff {
                fs::remove_dir_all(&entry.path).map_err(|e| {
                    WheelwrightError::io(format!("removing {}", entry.path.display()), e)
                })?;
                removed.push(entry.id.dir_name());
            }
        }

        if !removed.is_empty() {
            info!("Garbage-collected {} store entr(ies)", removed.len());
        }
        Ok(removed)
    }

    /// Remove every entry. Returns the number removed.
    pub fn clear(&self) -> WwResult<usize> {
        let entries = self.entries()?;
        let count = entries.len();
        for entry in entries {
            fs::remove_dir_all(&entry.path).map_err(|e| {
                WheelwrightError::io(format!("removing {}", entry.path.display()), e)
            })?;
        }
        Ok(count)
    }

    /// Total size of all published artifacts in bytes
    pub fn size_bytes(&self) -> WwResult<u64> {
        let mut total = 0;
        for entry in self.entries()? {
            for file in &entry.meta.files {
                if let Ok(md) = fs::metadata(entry.path.join(file)) {
                    total += md.len();
                }
            }
        }
        Ok(total)
    }

    fn read_meta(&self, path: &Path, key: &str) -> WwResult<EntryMeta> {
        let content = fs::read_to_string(path)
            .map_err(|e| WheelwrightError::io(format!("reading {}", path.display()), e))?;
        toml::from_str(&content).map_err(|e| WheelwrightError::CacheEntryCorrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}
