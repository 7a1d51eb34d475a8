//! Build unit selection
//!
//! A selector names exactly one workspace member, by package name,
//! manifest path, or both. Anything that resolves to zero or more than
//! one member is an error before any compilation starts.

use crate::error::{WheelwrightError, WwResult};
use crate::workspace::{Workspace, WorkspaceMember};
use std::path::PathBuf;

/// Selects one buildable unit out of a workspace
#[derive(Debug, Clone, Default)]
pub struct UnitSelector {
    /// Package name to select
    pub package: Option<String>,
    /// Manifest path to select (absolute or workspace-relative)
    pub manifest_path: Option<PathBuf>,
}

impl UnitSelector {
    /// Select by package name
    pub fn package(name: impl Into<String>) -> Self {
        Self {
            package: Some(name.into()),
            manifest_path: None,
        }
    }

    /// Select by manifest path
    pub fn manifest(path: impl Into<PathBuf>) -> Self {
        Self {
            package: None,
            manifest_path: Some(path.into()),
        }
    }

    /// Human-readable form for error messages
    pub fn describe(&self) -> String {
        match (&self.package, &self.manifest_path) {
            (Some(p), Some(m)) => format!("{} ({})", p, m.display()),
            (Some(p), None) => p.clone(),
            (None, Some(m)) => m.display().to_string(),
            (None, None) => "<default>".to_string(),
        }
    }

    /// Resolve against a workspace to exactly one member.
    ///
    /// With neither name nor path set, a single-member workspace resolves
    /// to that member; anything larger is ambiguous.
    pub fn resolve<'ws>(&self, workspace: &'ws Workspace) -> WwResult<&'ws WorkspaceMember> {
        let by_path: Option<&WorkspaceMember> = match &self.manifest_path {
            Some(path) => {
                let wanted = if path.is_absolute() {
                    path.clone()
                } else {
                    workspace.root.join(path)
                };
                let found = workspace
                    .members
                    .iter()
                    .find(|m| m.manifest_path == wanted || m.dir == wanted);
                match found {
                    Some(m) => Some(m),
                    None => return Err(WheelwrightError::SelectorNotFound(self.describe())),
                }
            }
            None => None,
        };

        match (&self.package, by_path) {
            (Some(name), Some(member)) => {
                if member.name == *name {
                    Ok(member)
                } else {
                    Err(WheelwrightError::SelectorAmbiguous {
                        selector: self.describe(),
                        matches: vec![name.clone(), member.name.clone()],
                    })
                }
            }
            (Some(name), None) => {
                let matches: Vec<&WorkspaceMember> = workspace
                    .members
                    .iter()
                    .filter(|m| m.name == *name)
                    .collect();
                match matches.as_slice() {
                    [] => Err(WheelwrightError::SelectorNotFound(self.describe())),
                    [one] => Ok(one),
                    many => Err(WheelwrightError::SelectorAmbiguous {
                        selector: self.describe(),
                        matches: many.iter().map(|m| m.manifest_path.display().to_string()).collect(),
                    }),
                }
            }
            (None, Some(member)) => Ok(member),
            (None, None) => match workspace.members.as_slice() {
                [one] => Ok(one),
                many => Err(WheelwrightError::SelectorAmbiguous {
                    selector: self.describe(),
                    matches: many.iter().map(|m| m.name.clone()).collect(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn two_member_workspace() -> (TempDir, Workspace) {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            "[workspace]\nmembers = [\"core\", \"bridge\"]\n",
        )
        .unwrap();
        fs::write(temp.path().join("Cargo.lock"), "").unwrap();
        for name in ["core", "bridge"] {
            let dir = temp.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(
                dir.join("Cargo.toml"),
                format!("[package]\nname = \"{}\"\nversion = \"0.1.0\"\n", name),
            )
            .unwrap();
        }
        let ws = Workspace::discover(temp.path()).unwrap();
        (temp, ws)
    }

    #[test]
    fn select_by_name() {
        let (_temp, ws) = two_member_workspace();
        let member = UnitSelector::package("core").resolve(&ws).unwrap();
        assert_eq!(member.name, "core");
    }

    #[test]
    fn select_by_relative_manifest_path() {
        let (_temp, ws) = two_member_workspace();
        let member = UnitSelector::manifest("bridge/Cargo.toml")
            .resolve(&ws)
            .unwrap();
        assert_eq!(member.name, "bridge");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let (_temp, ws) = two_member_workspace();
        let err = UnitSelector::package("nope").resolve(&ws).unwrap_err();
        assert!(matches!(err, WheelwrightError::SelectorNotFound(_)));
    }

    #[test]
    fn name_path_disagreement_is_ambiguous() {
        let (_temp, ws) = two_member_workspace();
        let selector = UnitSelector {
            package: Some("core".to_string()),
            manifest_path: Some(PathBuf::from("bridge/Cargo.toml")),
        };
        let err = selector.resolve(&ws).unwrap_err();
        assert!(matches!(err, WheelwrightError::SelectorAmbiguous { .. }));
    }

    #[test]
    fn default_selector_needs_single_member() {
        let (_temp, ws) = two_member_workspace();
        let err = UnitSelector::default().resolve(&ws).unwrap_err();
        assert!(matches!(err, WheelwrightError::SelectorAmbiguous { .. }));
    }
}
