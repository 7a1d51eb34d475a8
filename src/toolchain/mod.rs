//! External build tool seams
//!
//! Each tool the pipeline drives (cargo, maturin, pip) sits behind a
//! narrow async trait so orchestration logic can be exercised against
//! stubs. The real implementations shell out with fixed flags and map
//! tool diagnostics onto the error taxonomy.

mod cargo;
mod maturin;
mod pip;
mod tool;

pub use cargo::CargoCompiler;
pub use maturin::{sole_wheel_in, MaturinBuilder};
pub use pip::PipInstaller;
pub use tool::{
    InstallRequest, ToolOutput, WheelBuilder, WheelInstaller, WheelRequest, WorkspaceCompiler,
};

use crate::error::{WheelwrightError, WwResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Max number of output lines to include in build error messages.
const DIAGNOSTIC_TAIL_LINES: usize = 50;

/// Extract the useful tail of tool output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last
/// `DIAGNOSTIC_TAIL_LINES` lines so error messages stay actionable
/// without being overwhelming.
pub(crate) fn diagnostic_tail(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let total = lines.len();
    let tail: Vec<&str> = if total > DIAGNOSTIC_TAIL_LINES {
        lines[total - DIAGNOSTIC_TAIL_LINES..].to_vec()
    } else {
        lines
    };
    tail.join("\n")
}

/// Run an external tool to completion, capturing output.
pub(crate) async fn run_tool(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> WwResult<ToolOutput> {
    debug!("Executing: {} {:?}", program, args);

    let mut cmd = Command::new(program);
    cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WheelwrightError::ToolNotFound {
                name: program.to_string(),
                hint: "Check it is installed and on PATH, or point the config at it".to_string(),
            }
        } else {
            WheelwrightError::command_failed(format!("{} {:?}", program, args), e)
        }
    })?;

    Ok(ToolOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Check whether a tool responds to `--version`.
pub(crate) async fn tool_responds(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Parse a version out of typical `tool --version` output.
///
/// Handles `cargo 1.82.0 (8f40fc59f 2024-08-21)`, `maturin 1.7.4`, and
/// pip's two-component `pip 24.2 from ...` by padding to three parts.
pub fn parse_tool_version(output: &str) -> Option<semver::Version> {
    for token in output.split_whitespace() {
        let candidate = match token.matches('.').count() {
            1 => format!("{}.0", token),
            2 => token.to_string(),
            _ => continue,
        };
        if let Ok(v) = semver::Version::parse(&candidate) {
            return Some(v);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_short_output() {
        let tail = diagnostic_tail("line one", "line two");
        assert_eq!(tail, "line one\nline two");
    }

    #[test]
    fn tail_truncates_long_output() {
        let stdout = (0..100)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let tail = diagnostic_tail(&stdout, "");
        assert_eq!(tail.lines().count(), DIAGNOSTIC_TAIL_LINES);
        assert!(tail.ends_with("line 99"));
    }

    #[test]
    fn version_parsing() {
        let v = parse_tool_version("cargo 1.82.0 (8f40fc59f 2024-08-21)").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 82);

        let v = parse_tool_version("pip 24.2 from /usr/lib (python 3.12)").unwrap();
        assert_eq!(v.major, 24);

        assert!(parse_tool_version("no version here").is_none());
    }
}
