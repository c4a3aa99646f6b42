//! Whoami command - show the resolved session

use anyhow::Result;
use colored::Colorize;
use recipebox_core::Session;

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let (ctx, _logger) = get_context("whoami")?;

    let spinner = output::spinner("Checking session...");
    let session = ctx.session_service.resolve_current().await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    match session {
        Session::Anonymous => {
            println!("Session: {}", "anonymous".yellow());
            output::info(&format!(
                "Log in at {}{} to manage favorites and the shopping cart",
                ctx.config.api_base_url, ctx.config.login_path
            ));
        }
        Session::Authenticated(user) => {
            println!("Session: {}", "signed in".green());
            let mut table = output::create_table();
            table.add_row(vec!["User ID".to_string(), user.id.to_string()]);
            table.add_row(vec![
                "Favorites".to_string(),
                user.favorite_recipe_ids.len().to_string(),
            ]);
            table.add_row(vec![
                "Cart".to_string(),
                user.shopping_cart.len().to_string(),
            ]);
            println!("{}", table);
        }
    }

    if ctx.is_demo() {
        output::info("Demo mode is on");
    }
    Ok(())
}
