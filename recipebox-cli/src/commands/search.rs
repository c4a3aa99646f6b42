//! Search command - search recipes by ingredient and diet

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use recipebox_core::ports::ResultsView;
use recipebox_core::services::PageOutcome;
use recipebox_core::OperationResult;

use super::get_context;
use crate::output;

pub async fn run(
    include: String,
    exclude: String,
    diet: String,
    out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let (ctx, _logger) = get_context("search")?;
    let mut controller = ctx.controller();

    let spinner = output::spinner("Searching recipes...");
    let outcome = controller.search(&include, &exclude, &diet).await;
    spinner.finish_and_clear();

    if json {
        let result = match &outcome {
            PageOutcome::Rendered { .. } => OperationResult::ok(controller.recipes().to_vec()),
            PageOutcome::ReadFailed { message } => {
                OperationResult::fail(format!("Search failed: {}", message))
            }
            _ => OperationResult::fail(
                controller
                    .view()
                    .error()
                    .unwrap_or("No recipes found")
                    .to_string(),
            ),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match outcome {
        PageOutcome::Rendered { count } => {
            println!("{} {}", "Recipes:".bold(), count);
            output::print_recipes(controller.recipes(), &controller.session(), false);
        }
        PageOutcome::ReadFailed { message } => output::error(&format!("Search failed: {}", message)),
        _ => {}
    }
    output::finish_page(controller.view(), "Recipe Search", out.as_deref())
}
