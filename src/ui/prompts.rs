//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{WheelwrightError, WwResult};

/// Prompt for confirmation, returns default if non-interactive or auto-yes
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> WwResult<bool> {
    if ctx.auto_yes() {
        println!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // Run blocking cliclack prompt in spawn_blocking
    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| WheelwrightError::User(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| WheelwrightError::User(format!("Prompt failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_interactive_returns_default() {
        let ctx = UiContext::non_interactive();
        assert!(!confirm(&ctx, "proceed?", false).await.unwrap());
        assert!(confirm(&ctx, "proceed?", true).await.unwrap());
    }

    #[tokio::test]
    async fn auto_yes_always_confirms() {
        let ctx = UiContext::non_interactive().with_auto_yes(true);
        assert!(confirm(&ctx, "proceed?", false).await.unwrap());
    }
}
