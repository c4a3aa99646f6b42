//! Recipebox CLI - recipe search, favorites and shopping cart in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::toggle::Target;
use commands::{config, demo, favorites, logs, search, show, toggle, whoami};

/// Recipebox - recipe search, favorites and shopping cart
#[derive(Parser)]
#[command(name = "rb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recipes (random picks when no criteria are given)
    Search {
        /// Ingredients to include, e.g. "chicken, rice"
        #[arg(long, short, default_value = "")]
        include: String,
        /// Ingredients to exclude
        #[arg(long, short, default_value = "")]
        exclude: String,
        /// Diet filter, e.g. vegan
        #[arg(long, short, default_value = "none")]
        diet: String,
        /// Write the rendered results page to this HTML file
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show your favorite recipes
    Favorites {
        /// Write the rendered favorites page to this HTML file
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add or remove a recipe from favorites
    Favorite {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add or remove a recipe from the shopping cart
    Cart {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show full details for a recipe
    Show {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search {
            include,
            exclude,
            diet,
            out,
            json,
        } => search::run(include, exclude, diet, out, json).await,
        Commands::Favorites { out, json } => favorites::run(out, json).await,
        Commands::Favorite { id, json } => toggle::run(Target::Favorite, id, json).await,
        Commands::Cart { id, json } => toggle::run(Target::Cart, id, json).await,
        Commands::Show { id, json } => show::run(id, json).await,
        Commands::Whoami { json } => whoami::run(json).await,
        Commands::Config { command } => config::run(command),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
