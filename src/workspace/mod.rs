//! Cargo workspace model
//!
//! Discovers workspace members from the root manifest, enforces the
//! frozen-lock invariant, and computes the content hash that keys the
//! shared artifact store. Same sources + same lock + same lock policy
//! = same cache key.

mod hash;
mod manifest;
mod selector;

pub use hash::content_hash;
pub use manifest::{Workspace, WorkspaceMember};
pub use selector::UnitSelector;
