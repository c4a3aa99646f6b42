//! Show command - full details for one recipe

use anyhow::{Context, Result};
use colored::Colorize;

use super::get_context;
use crate::output;

pub async fn run(recipe_id: i64, json: bool) -> Result<()> {
    let (ctx, _logger) = get_context("show")?;
    let controller = ctx.controller();

    let spinner = output::spinner("Fetching recipe...");
    let recipe = controller.recipe_details(recipe_id).await;
    let session = ctx.session_service.resolve_current().await;
    spinner.finish_and_clear();

    let recipe = recipe.with_context(|| format!("Could not load recipe {}", recipe_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    println!("{}", recipe.title.bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["ID".to_string(), recipe.id.to_string()]);
    if !recipe.cuisine.is_empty() {
        table.add_row(vec!["Cuisine".to_string(), recipe.cuisine.join(", ")]);
    }
    table.add_row(vec!["Ready in".to_string(), format!("{} min", recipe.prep_time)]);
    if !recipe.source_url.is_empty() {
        table.add_row(vec!["Source".to_string(), recipe.source_url.clone()]);
    }
    if let Some(user) = session.user() {
        let mark = |on: bool| if on { "yes" } else { "no" }.to_string();
        table.add_row(vec!["Favorite".to_string(), mark(user.is_favorite(recipe.id))]);
        table.add_row(vec!["In cart".to_string(), mark(user.is_in_cart(recipe.id))]);
    }
    println!("{}", table);

    let summary = recipe.plain_summary();
    if !summary.is_empty() {
        println!();
        println!("{}", "Summary".bold());
        println!("{}", summary);
    }

    let instructions = recipe.plain_instructions();
    if !instructions.is_empty() {
        println!();
        println!("{}", "Instructions".bold());
        println!("{}", instructions);
    }

    Ok(())
}
