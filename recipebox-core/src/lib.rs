//! Recipebox Core - recipe search, favorites and shopping-cart client
//!
//! This crate implements the client logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Recipe, UserSession, SearchCriteria, card markup)
//! - **ports**: Trait definitions for external collaborators (RecipeApi, ResultsView)
//! - **services**: Query parsing, session toggles, rendering, page control
//! - **adapters**: Concrete implementations (HTTP backend, demo backend, in-memory page)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::demo::DemoRecipeApi;
use adapters::http::HttpRecipeApi;
use adapters::page::MemoryPage;
use config::Config;
use ports::RecipeApi;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{Recipe, ResultsMarkup, SearchCriteria, Session, UserSession};

/// Main context for Recipebox operations
///
/// Builds the backend adapter from configuration and hands out the
/// services that share it.
pub struct RecipeboxContext {
    pub config: Config,
    pub api: Arc<dyn RecipeApi>,
    pub session_service: Arc<SessionService>,
    pub demo_service: DemoService,
    demo_api: Option<Arc<DemoRecipeApi>>,
    logger: Option<Arc<LoggingService>>,
}

impl RecipeboxContext {
    /// Create a new Recipebox context
    pub fn new(recipebox_dir: &Path, logger: Option<Arc<LoggingService>>) -> Result<Self> {
        let config = Config::load(recipebox_dir)?;
        let demo_service = DemoService::new(recipebox_dir);

        let demo_api = if config.demo_mode {
            Some(Arc::new(demo_service.load_api()?))
        } else {
            None
        };
        let api: Arc<dyn RecipeApi> = match &demo_api {
            Some(demo) => demo.clone(),
            None => Arc::new(HttpRecipeApi::new(
                &config.api_base_url,
                config.request_timeout(),
            )?),
        };

        let session_service = Arc::new(
            SessionService::new(Arc::clone(&api), config.request_timeout())
                .with_logger(logger.clone()),
        );

        Ok(Self {
            config,
            api,
            session_service,
            demo_service,
            demo_api,
            logger,
        })
    }

    pub fn is_demo(&self) -> bool {
        self.demo_api.is_some()
    }

    /// Controller for one page, backed by an in-memory page surface
    pub fn controller(&self) -> RecipeSearchController<MemoryPage> {
        RecipeSearchController::new(
            Arc::clone(&self.api),
            Arc::clone(&self.session_service),
            MemoryPage::new(),
            self.config.login_path.clone(),
        )
        .with_logger(self.logger.clone())
    }

    /// Write demo favorites and cart back to disk (no-op outside demo mode)
    pub fn persist(&self) -> Result<()> {
        match &self.demo_api {
            Some(demo) => self.demo_service.save_api(demo),
            None => Ok(()),
        }
    }
}
