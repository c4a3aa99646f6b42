//! Recipe search controller - home search and favorites pages
//!
//! Wires query parsing, backend reads, rendering and control dispatch.
//! Read-path failures show the no-results message and are reported as
//! `ReadFailed`; toggle failures leave local state alone, re-enable the
//! control and show a failure message.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{
    CartState, ControlAction, ControlId, FavoriteState, Recipe, RecipeRecord, SearchCriteria,
    Session,
};
use crate::ports::{RecipeApi, ResultsView};
use crate::services::logging::{LogEvent, LoggingService};
use crate::services::query::SearchQueryBuilder;
use crate::services::render::{RenderContext, ResultsRenderer};
use crate::services::session::SessionService;

/// Shown when a favorite or cart toggle fails
pub const TOGGLE_FAILED_MESSAGE: &str = "Could not update this recipe. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Home,
    Favorites,
}

impl PageKind {
    pub fn name(self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Favorites => "favorites",
        }
    }

    /// Cart controls only appear on the favorites page
    pub fn render_context(self) -> RenderContext {
        RenderContext {
            show_cart_controls: self == PageKind::Favorites,
        }
    }
}

/// What a page load ended in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    Rendered { count: usize },
    /// Search matched nothing
    NoResults,
    /// Favorites page for a user with no favorites
    Empty,
    /// Backend read failed; the page shows the no-results message
    ReadFailed { message: String },
    Redirected { path: String },
}

/// Result of a dispatched control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Favorite { recipe_id: i64, state: FavoriteState },
    Cart { recipe_id: i64, state: CartState },
}

pub struct RecipeSearchController<V: ResultsView> {
    api: Arc<dyn RecipeApi>,
    sessions: Arc<SessionService>,
    renderer: ResultsRenderer<V>,
    queries: SearchQueryBuilder,
    login_path: String,
    page: PageKind,
    recipes: Vec<Recipe>,
    logger: Option<Arc<LoggingService>>,
}

impl<V: ResultsView> RecipeSearchController<V> {
    pub fn new(
        api: Arc<dyn RecipeApi>,
        sessions: Arc<SessionService>,
        view: V,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            api,
            sessions,
            renderer: ResultsRenderer::new(view),
            queries: SearchQueryBuilder::new(),
            login_path: login_path.into(),
            page: PageKind::Home,
            recipes: Vec::new(),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event.with_page(self.page.name()));
        }
    }

    pub fn page(&self) -> PageKind {
        self.page
    }

    /// Recipes behind the current cards
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn session(&self) -> Session {
        self.sessions.session()
    }

    pub fn renderer(&self) -> &ResultsRenderer<V> {
        &self.renderer
    }

    pub fn view(&self) -> &V {
        self.renderer.view()
    }

    pub fn into_view(self) -> V {
        self.renderer.into_view()
    }

    async fn ensure_session(&self) -> Session {
        if self.sessions.is_resolved() {
            self.sessions.session()
        } else {
            self.sessions.resolve_current().await
        }
    }

    /// Draw `self.recipes`
    ///
    /// An empty search shows the no-results message; an empty favorites
    /// list just clears the container.
    fn show(&mut self) -> PageOutcome {
        if self.recipes.is_empty() {
            return match self.page {
                PageKind::Home => {
                    self.renderer.show_no_results();
                    PageOutcome::NoResults
                }
                PageKind::Favorites => {
                    self.renderer.show_empty();
                    PageOutcome::Empty
                }
            };
        }
        let session = self.sessions.session();
        let sessions = Arc::clone(&self.sessions);
        self.renderer.show(
            &self.recipes,
            &session,
            |action| sessions.is_pending(action),
            self.page.render_context(),
        );
        PageOutcome::Rendered {
            count: self.recipes.len(),
        }
    }

    fn read_failed(&mut self, event: &str, error: &Error) -> PageOutcome {
        self.log(
            LogEvent::new(event)
                .with_error(error.to_string())
                .with_error_details(format!("{:?}", error)),
        );
        self.recipes.clear();
        self.renderer.show_no_results();
        PageOutcome::ReadFailed {
            message: error.to_string(),
        }
    }

    // === Home page ===

    /// Run a search from the three raw inputs
    ///
    /// Empty criteria fall back to a random batch.
    pub async fn search(&mut self, raw_include: &str, raw_exclude: &str, raw_diet: &str) -> PageOutcome {
        self.page = PageKind::Home;
        self.ensure_session().await;

        let criteria = self.queries.parse(raw_include, raw_exclude, raw_diet);
        let random = self.queries.is_empty(&criteria);
        self.log(LogEvent::new(if random { "search_random" } else { "search" }));

        let fetched = if random {
            self.api.random_recipes().await
        } else {
            self.filtered(&criteria).await
        };

        match fetched {
            Ok(records) => {
                self.recipes = records.into_iter().map(Recipe::from_record).collect();
                self.show()
            }
            Err(e) => self.read_failed("search_failed", &e),
        }
    }

    /// Filtered search plus the bulk detail round trip
    async fn filtered(&self, criteria: &SearchCriteria) -> Result<Vec<RecipeRecord>> {
        let found = self.api.complex_search(criteria).await?;
        if found.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
        self.api.recipes_info(&ids).await
    }

    // === Favorites page ===

    /// Show the signed-in user's favorites with cart controls
    ///
    /// Anonymous visitors are sent to the login path instead.
    pub async fn show_favorites(&mut self) -> PageOutcome {
        self.page = PageKind::Favorites;
        let session = self.ensure_session().await;

        if session.is_anonymous() {
            self.log(LogEvent::new("redirect_login"));
            self.recipes.clear();
            self.renderer.redirect(&self.login_path);
            return PageOutcome::Redirected {
                path: self.login_path.clone(),
            };
        }

        self.log(LogEvent::new("favorites"));
        match self.sessions.refresh_favorites().await {
            Ok(recipes) => {
                self.recipes = recipes;
                self.show()
            }
            Err(e) => self.read_failed("favorites_failed", &e),
        }
    }

    // === Controls ===

    /// Run whatever is bound to a control
    pub async fn dispatch(&mut self, control: &ControlId) -> Result<ToggleOutcome> {
        let action = self
            .renderer
            .view()
            .binding(control)
            .ok_or_else(|| Error::validation(format!("Control {} is not bound", control)))?;
        let recipe_id = action.recipe_id();

        // Disabled for the duration of the round trip
        let before = self.sessions.session();
        let sessions = Arc::clone(&self.sessions);
        self.renderer.refresh_controls(recipe_id, &before, |other| {
            other == action || sessions.is_pending(other)
        });

        let result = match action {
            ControlAction::ToggleFavorite(id) => self
                .sessions
                .toggle_favorite(id)
                .await
                .map(|state| ToggleOutcome::Favorite { recipe_id: id, state }),
            ControlAction::ToggleCart(id) => self
                .sessions
                .toggle_cart(id)
                .await
                .map(|state| ToggleOutcome::Cart { recipe_id: id, state }),
        };

        let session = self.sessions.session();
        match &result {
            Ok(ToggleOutcome::Favorite {
                state: FavoriteState::NotFavorite,
                ..
            }) if self.page == PageKind::Favorites => {
                self.recipes.retain(|r| r.id != recipe_id);
                self.show();
            }
            Ok(_) => {
                self.renderer
                    .refresh_controls(recipe_id, &session, |other| sessions.is_pending(other));
                self.renderer.clear_error();
            }
            Err(e) => {
                self.log(
                    LogEvent::new("toggle_failed")
                        .with_recipe(recipe_id)
                        .with_error(e.to_string()),
                );
                self.renderer
                    .refresh_controls(recipe_id, &session, |other| sessions.is_pending(other));
                self.renderer.show_error(TOGGLE_FAILED_MESSAGE);
            }
        }
        result
    }

    // === Details ===

    /// Full recipe for the details view
    pub async fn recipe_details(&self, recipe_id: i64) -> Result<Recipe> {
        self.log(LogEvent::new("recipe_details").with_recipe(recipe_id));
        let record = self.api.recipe_information(recipe_id).await?;
        Ok(Recipe::from_record(record))
    }
}
