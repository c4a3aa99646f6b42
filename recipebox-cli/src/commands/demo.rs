//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_recipebox_dir;
use recipebox_core::services::DemoService;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off {
        /// Also forget the demo user's favorites and cart
        #[arg(long)]
        clean: bool,
    },
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let recipebox_dir = get_recipebox_dir()?;
    std::fs::create_dir_all(&recipebox_dir)?;
    let demo_service = DemoService::new(&recipebox_dir);

    match command {
        Some(DemoCommands::On) => {
            demo_service.enable()?;
            println!("{}", "Demo mode enabled".green());
            println!("You are signed in as the demo user. Run 'rb search' to browse demo recipes.");
            Ok(())
        }
        Some(DemoCommands::Off { clean }) => {
            demo_service.disable(clean)?;
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if demo_service.is_enabled()? {
                let state = demo_service.load_state()?;
                println!("Demo mode is {}", "ON".green());
                println!(
                    "  Favorites: {}  Cart: {}",
                    state.favorites.len(),
                    state.cart.len()
                );
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
