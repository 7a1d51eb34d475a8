//! Shared content-addressed artifact store
//!
//! Build outputs are keyed by workspace content hash and shared across
//! independent orchestration runs. Entries are immutable once published.
//!
//! # Publish protocol
//!
//! | Step | Action |
//! |------|--------|
//! | 1 | Assemble files under `store/.tmp-<uuid>/` |
//! | 2 | Write `entry.toml` metadata last |
//! | 3 | One `rename` into `store/<kind>-<key>/` |
//!
//! Readers only see fully renamed entries, so a concurrent reader can
//! never observe a partial artifact set. Two writers racing on the same
//! key both succeed: the loser of the rename discards its temp dir and
//! adopts the published entry (idempotent writes).

pub mod store;

pub use store::{ArtifactStore, EntryId, EntryKind, EntryMeta, StoredEntry};

/// Format bytes as human-readable size (e.g., "1.5 GB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_formatting() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GB");
    }
}
