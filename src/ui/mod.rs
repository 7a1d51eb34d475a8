//! Terminal presentation layer
//!
//! Uses `cliclack` for step output and prompts with automatic fallback
//! to plain output in CI/non-interactive environments.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{intro, outro_success, step_info, step_ok_detail, step_warn, step_warn_hint};
pub use progress::{tool_spinner, TaskSpinner};
pub use prompts::confirm;
