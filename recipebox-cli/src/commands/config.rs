//! Config command - view and change settings

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use recipebox_core::config::Config;

use super::{get_recipebox_dir, get_logger, log_event};
use crate::output;
use recipebox_core::services::LogEvent;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the backend base URL
    SetUrl {
        /// Base URL, e.g. http://127.0.0.1:5000
        url: String,
    },
    /// Set the request timeout in seconds
    SetTimeout {
        secs: u64,
    },
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let recipebox_dir = get_recipebox_dir()?;
    std::fs::create_dir_all(&recipebox_dir)?;
    let mut config = Config::load(&recipebox_dir)?;
    log_event(&get_logger(), LogEvent::new("command").with_command("config"));

    match command {
        Some(ConfigCommands::SetUrl { url }) => {
            config.set_api_base_url(&url)?;
            config.save(&recipebox_dir)?;
            output::success(&format!("Backend URL set to {}", config.api_base_url));
        }
        Some(ConfigCommands::SetTimeout { secs }) => {
            config.set_request_timeout(secs)?;
            config.save(&recipebox_dir)?;
            output::success(&format!("Request timeout set to {}s", secs));
        }
        Some(ConfigCommands::Show { json: true }) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "apiBaseUrl": config.api_base_url,
                    "apiUrlFromEnv": config.api_url_from_env(),
                    "requestTimeoutSecs": config.request_timeout_secs,
                    "loginPath": config.login_path,
                    "demoMode": config.demo_mode,
                    "directory": recipebox_dir.to_string_lossy(),
                }))?
            );
        }
        Some(ConfigCommands::Show { json: false }) | None => {
            println!("{}", "Recipebox Settings".bold());
            let mut table = output::create_table();
            let url = if config.api_url_from_env() {
                format!("{} (from RECIPEBOX_API_URL)", config.api_base_url)
            } else {
                config.api_base_url.clone()
            };
            table.add_row(vec!["Backend URL".to_string(), url]);
            table.add_row(vec![
                "Request timeout".to_string(),
                format!("{}s", config.request_timeout_secs),
            ]);
            table.add_row(vec!["Login path".to_string(), config.login_path.clone()]);
            table.add_row(vec!["Demo mode".to_string(), config.demo_mode.to_string()]);
            table.add_row(vec![
                "Directory".to_string(),
                recipebox_dir.display().to_string(),
            ]);
            println!("{}", table);
        }
    }
    Ok(())
}
