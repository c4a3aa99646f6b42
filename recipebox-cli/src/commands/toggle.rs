//! Favorite and cart commands - flip one recipe's membership

use anyhow::{Context, Result};
use recipebox_core::services::{LogEvent, ToggleOutcome};
use recipebox_core::OperationResult;

use super::{get_context, log_event};
use crate::output;

#[derive(Debug, Clone, Copy)]
pub enum Target {
    Favorite,
    Cart,
}

impl Target {
    fn command(self) -> &'static str {
        match self {
            Target::Favorite => "favorite",
            Target::Cart => "cart",
        }
    }
}

pub async fn run(target: Target, recipe_id: i64, json: bool) -> Result<()> {
    let (ctx, logger) = get_context(target.command())?;
    let sessions = &ctx.session_service;

    let spinner = output::spinner("Updating...");
    let session = sessions.resolve_current().await;
    let result = match target {
        Target::Favorite => sessions
            .toggle_favorite(recipe_id)
            .await
            .map(|state| ToggleOutcome::Favorite { recipe_id, state }),
        Target::Cart => sessions
            .toggle_cart(recipe_id)
            .await
            .map(|state| ToggleOutcome::Cart { recipe_id, state }),
    };
    spinner.finish_and_clear();

    match &result {
        Ok(_) => ctx.persist().context("Failed to save demo state")?,
        Err(e) => log_event(
            &logger,
            LogEvent::new("toggle_failed")
                .with_command(target.command())
                .with_recipe(recipe_id)
                .with_error(e.to_string()),
        ),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::from(result))?);
        return Ok(());
    }

    match result {
        Ok(ToggleOutcome::Favorite { state, .. }) => {
            if state.is_favorite() {
                output::success(&format!("Recipe {} added to favorites", recipe_id));
            } else {
                output::success(&format!("Recipe {} removed from favorites", recipe_id));
            }
            Ok(())
        }
        Ok(ToggleOutcome::Cart { state, .. }) => {
            if state.is_in_cart() {
                output::success(&format!("Recipe {} added to shopping cart", recipe_id));
            } else {
                output::success(&format!("Recipe {} removed from shopping cart", recipe_id));
            }
            Ok(())
        }
        Err(e) if session.is_anonymous() => Err(anyhow::anyhow!(
            "{}. Log in at {}{}",
            e,
            ctx.config.api_base_url,
            ctx.config.login_path
        )),
        Err(e) => Err(e).context(format!("Could not update recipe {}", recipe_id)),
    }
}
