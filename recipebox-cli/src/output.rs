//! Output formatting utilities

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use recipebox_core::adapters::page::MemoryPage;
use recipebox_core::domain::strip_tags;
use recipebox_core::{Recipe, Session};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Spinner on stderr while waiting on the backend; hidden when not a TTY
pub fn spinner(msg: &str) -> ProgressBar {
    if !atty::is(atty::Stream::Stderr) {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Shorten plain text to `max` characters
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Table of rendered recipes with the session's favorite/cart marks
pub fn print_recipes(recipes: &[Recipe], session: &Session, show_cart: bool) {
    let mut table = create_table();
    let mut header = vec!["ID", "Title", "Ready in", "Favorite"];
    if show_cart {
        header.push("Cart");
    }
    header.push("Summary");
    table.set_header(header);

    for recipe in recipes {
        let mut row = vec![
            recipe.id.to_string(),
            recipe.title.clone(),
            format!("{} min", recipe.prep_time),
            if session.is_favorite(recipe.id) { "★" } else { "" }.to_string(),
        ];
        if show_cart {
            row.push(if session.is_in_cart(recipe.id) { "✓" } else { "" }.to_string());
        }
        row.push(clip(&strip_tags(&recipe.summary), 60));
        table.add_row(row);
    }
    println!("{}", table);
}

/// Print the page's error slot and write the document when asked
pub fn finish_page(page: &MemoryPage, heading: &str, out: Option<&Path>) -> anyhow::Result<()> {
    use recipebox_core::ports::ResultsView;

    if let Some(message) = page.error() {
        warning(message);
    }
    if let Some(path) = out {
        page.write_document(path, heading)?;
        info(&format!("Page written to {}", path.display()));
    }
    Ok(())
}
