//! Favorites command - show the signed-in user's favorite recipes

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use recipebox_core::services::PageOutcome;
use recipebox_core::{OperationResult, Recipe};

use super::get_context;
use crate::output;

/// JSON shape for a favorites page load
fn json_result(outcome: &PageOutcome, recipes: &[Recipe]) -> OperationResult<Vec<Recipe>> {
    match outcome {
        PageOutcome::Rendered { .. } | PageOutcome::Empty | PageOutcome::NoResults => {
            OperationResult::ok(recipes.to_vec())
        }
        PageOutcome::ReadFailed { message } => {
            OperationResult::fail(format!("Could not load favorites: {}", message))
        }
        PageOutcome::Redirected { path } => {
            OperationResult::fail(format!("Not logged in; log in at {}", path))
        }
    }
}

pub async fn run(out: Option<PathBuf>, json: bool) -> Result<()> {
    let (ctx, _logger) = get_context("favorites")?;
    let mut controller = ctx.controller();

    let spinner = output::spinner("Loading favorites...");
    let outcome = controller.show_favorites().await;
    spinner.finish_and_clear();

    if json {
        let result = json_result(&outcome, controller.recipes());
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match outcome {
        PageOutcome::Redirected { path } => {
            output::warning(&format!(
                "Not logged in. Log in at {}{}",
                ctx.config.api_base_url, path
            ));
            Ok(())
        }
        PageOutcome::ReadFailed { message } => {
            output::error(&format!("Could not load favorites: {}", message));
            output::finish_page(controller.view(), "Favorites", out.as_deref())
        }
        PageOutcome::Empty | PageOutcome::NoResults => {
            println!("No favorites yet. Use 'rb favorite <ID>' to add one.");
            output::finish_page(controller.view(), "Favorites", out.as_deref())
        }
        PageOutcome::Rendered { count } => {
            println!("{} {}", "Favorites:".bold(), count);
            output::print_recipes(controller.recipes(), &controller.session(), true);
            output::finish_page(controller.view(), "Favorites", out.as_deref())
        }
    }
}
