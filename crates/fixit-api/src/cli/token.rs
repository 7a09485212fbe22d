//! API token CLI commands: issue, revoke.

use anyhow::Result;
use console::style;

use fixit_types::chat::UserId;

use crate::state::AppState;

/// Mint a token for `user_id` and print it once.
pub async fn issue_token(state: &AppState, user_id: UserId, json: bool) -> Result<()> {
    let token = state.tokens.issue(user_id).await?;

    if json {
        println!("{}", serde_json::json!({"userId": user_id, "token": token}));
    } else {
        println!();
        println!(
            "  {} Token for user {} (save this -- it won't be shown again):",
            style("🔑").bold(),
            style(user_id).cyan()
        );
        println!();
        println!("  {}", style(&token).yellow().bold());
        println!();
    }

    Ok(())
}

/// Delete every token of `user_id`.
pub async fn revoke_tokens(state: &AppState, user_id: UserId, json: bool) -> Result<()> {
    let removed = state.tokens.revoke_user(user_id).await?;

    if json {
        println!("{}", serde_json::json!({"userId": user_id, "revoked": removed}));
    } else {
        println!(
            "  {} Revoked {} token{} of user {}",
            style("✓").green().bold(),
            style(removed).bold(),
            if removed == 1 { "" } else { "s" },
            style(user_id).cyan()
        );
    }

    Ok(())
}
