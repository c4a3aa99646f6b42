//! CLI command implementations

pub mod config;
pub mod demo;
pub mod favorites;
pub mod logs;
pub mod search;
pub mod show;
pub mod toggle;
pub mod whoami;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use recipebox_core::services::{EntryPoint, LogEvent, LoggingService};
use recipebox_core::RecipeboxContext;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (never blocks a command)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let recipebox_dir = get_recipebox_dir().ok()?;
    std::fs::create_dir_all(&recipebox_dir).ok()?;
    LoggingService::new(&recipebox_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the recipebox directory from environment or default
pub fn get_recipebox_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RECIPEBOX_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".recipebox"))
        .context("Could not find home directory; set RECIPEBOX_DIR")
}

/// Build the recipebox context for a command, logging the invocation
pub fn get_context(command: &str) -> Result<(RecipeboxContext, Option<Arc<LoggingService>>)> {
    let recipebox_dir = get_recipebox_dir()?;
    std::fs::create_dir_all(&recipebox_dir)
        .with_context(|| format!("Failed to create recipebox directory: {:?}", recipebox_dir))?;

    let logger = get_logger();
    log_event(&logger, LogEvent::new("command").with_command(command));

    let ctx = RecipeboxContext::new(&recipebox_dir, logger.clone())
        .context("Failed to initialize recipebox context")?;
    Ok((ctx, logger))
}
