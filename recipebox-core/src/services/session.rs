//! Session service - current user, favorites and cart toggles
//!
//! Holds the resolved `Session` and keeps its favorite/cart sets in step with
//! the backend. Local sets change only after the backend acknowledged a call.
//! Each control (favorite or cart of one recipe) has at most one toggle in
//! flight; the pending token is released when the toggle finishes, fails, or
//! times out.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{CartState, ControlAction, FavoriteState, Recipe, Session, UserSession};
use crate::ports::RecipeApi;
use crate::services::logging::{LogEvent, LoggingService};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-flight toggle for one control; dropping it re-enables the control
struct PendingGuard<'a> {
    arena: &'a Mutex<HashMap<ControlAction, Uuid>>,
    action: ControlAction,
    token: Uuid,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut arena = lock(self.arena);
        if arena.get(&self.action) == Some(&self.token) {
            arena.remove(&self.action);
        }
    }
}

/// Session service for identity resolution and toggles
pub struct SessionService {
    api: Arc<dyn RecipeApi>,
    /// `None` until resolved
    session: Mutex<Option<Session>>,
    pending: Mutex<HashMap<ControlAction, Uuid>>,
    timeout: Duration,
    logger: Option<Arc<LoggingService>>,
}

impl SessionService {
    pub fn new(api: Arc<dyn RecipeApi>, timeout: Duration) -> Self {
        Self {
            api,
            session: Mutex::new(None),
            pending: Mutex::new(HashMap::new()),
            timeout,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    /// Start from an already known session instead of resolving
    pub fn with_session(self, session: Session) -> Self {
        *lock(&self.session) = Some(session);
        self
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }

    /// Run a backend future under the request timeout
    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.timeout.as_secs())),
        }
    }

    // === Identity ===

    /// Resolve the signed-in user from the backend
    ///
    /// Never fails: no identity and backend failure both yield `Anonymous`,
    /// but failures are logged as `session_resolve_failed`.
    pub async fn resolve_current(&self) -> Session {
        let resolved = match self.bounded(self.api.current_user()).await {
            Ok(Some(record)) => {
                let cart = match self.bounded(self.api.user_cart(record.id)).await {
                    Ok(cart) => cart,
                    Err(e) => {
                        self.log(
                            LogEvent::new("cart_load_failed")
                                .with_error(e.to_string())
                                .with_error_details(format!("{:?}", e)),
                        );
                        Vec::new()
                    }
                };
                self.log(LogEvent::new("session_resolved"));
                Session::Authenticated(UserSession::from_record(&record, cart))
            }
            Ok(None) => {
                self.log(LogEvent::new("session_anonymous"));
                Session::Anonymous
            }
            Err(e) => {
                self.log(
                    LogEvent::new("session_resolve_failed")
                        .with_error(e.to_string())
                        .with_error_details(format!("{:?}", e)),
                );
                Session::Anonymous
            }
        };
        *lock(&self.session) = Some(resolved.clone());
        resolved
    }

    pub fn is_resolved(&self) -> bool {
        lock(&self.session).is_some()
    }

    /// Snapshot of the current session (`Anonymous` until resolved)
    pub fn session(&self) -> Session {
        lock(&self.session).clone().unwrap_or(Session::Anonymous)
    }

    fn user_id(&self) -> Result<i64> {
        match &*lock(&self.session) {
            Some(Session::Authenticated(user)) => Ok(user.id),
            _ => Err(Error::ReadOnlySession),
        }
    }

    fn update_user(&self, f: impl FnOnce(&mut UserSession)) {
        if let Some(Session::Authenticated(user)) = &mut *lock(&self.session) {
            f(user);
        }
    }

    // === Lookups ===

    pub fn is_favorite(&self, recipe_id: i64) -> bool {
        self.session().is_favorite(recipe_id)
    }

    pub fn is_in_cart(&self, recipe_id: i64) -> bool {
        self.session().is_in_cart(recipe_id)
    }

    /// Whether any toggle for this recipe is waiting on the backend
    pub fn pending(&self, recipe_id: i64) -> bool {
        lock(&self.pending)
            .keys()
            .any(|action| action.recipe_id() == recipe_id)
    }

    /// Whether this particular control is waiting on the backend
    pub fn is_pending(&self, action: ControlAction) -> bool {
        lock(&self.pending).contains_key(&action)
    }

    fn begin(&self, action: ControlAction) -> Result<PendingGuard<'_>> {
        let mut arena = lock(&self.pending);
        if arena.contains_key(&action) {
            return Err(Error::ToggleInFlight(action.recipe_id()));
        }
        let token = Uuid::new_v4();
        arena.insert(action, token);
        Ok(PendingGuard {
            arena: &self.pending,
            action,
            token,
        })
    }

    fn toggle_failed(&self, event: &str, recipe_id: i64, error: Error) -> Error {
        self.log(
            LogEvent::new(event)
                .with_recipe(recipe_id)
                .with_error(error.to_string()),
        );
        error
    }

    // === Mutations ===

    /// Flip favorite membership for a recipe
    pub async fn toggle_favorite(&self, recipe_id: i64) -> Result<FavoriteState> {
        let user_id = self.user_id()?;
        let _guard = self.begin(ControlAction::ToggleFavorite(recipe_id))?;

        if self.is_favorite(recipe_id) {
            self.bounded(self.api.remove_favorite(user_id, recipe_id))
                .await
                .map_err(|e| self.toggle_failed("favorite_remove_failed", recipe_id, e))?;
            self.update_user(|u| u.set_favorite(recipe_id, false));
            self.log(LogEvent::new("favorite_removed").with_recipe(recipe_id));
            Ok(FavoriteState::NotFavorite)
        } else {
            self.bounded(self.store_favorite(user_id, recipe_id))
                .await
                .map_err(|e| self.toggle_failed("favorite_add_failed", recipe_id, e))?;
            self.update_user(|u| u.set_favorite(recipe_id, true));
            self.log(LogEvent::new("favorite_added").with_recipe(recipe_id));
            Ok(FavoriteState::Favorited)
        }
    }

    /// Flip shopping-cart membership for a recipe
    ///
    /// The resulting membership is whatever the server reports, never a
    /// prediction from the local set.
    pub async fn toggle_cart(&self, recipe_id: i64) -> Result<CartState> {
        let user_id = self.user_id()?;
        let _guard = self.begin(ControlAction::ToggleCart(recipe_id))?;

        let in_cart = self
            .bounded(self.flip_cart(user_id, recipe_id))
            .await
            .map_err(|e| self.toggle_failed("cart_toggle_failed", recipe_id, e))?;

        self.update_user(|u| u.set_in_cart(recipe_id, in_cart));
        self.log(LogEvent::new("cart_toggled").with_recipe(recipe_id));
        Ok(CartState::from_flag(in_cart))
    }

    /// Search results are abbreviated, so the full record is fetched before
    /// the backend is asked to store the favorite
    async fn store_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        self.api.recipe_information(recipe_id).await?;
        self.api.add_favorite(user_id, recipe_id).await
    }

    /// PATCH the cart, then read back membership if the ack omits it
    async fn flip_cart(&self, user_id: i64, recipe_id: i64) -> Result<bool> {
        let ack = self.api.toggle_cart(user_id, recipe_id).await?;
        match ack.in_cart {
            Some(in_cart) => Ok(in_cart),
            None => Ok(self.api.user_cart(user_id).await?.contains(&recipe_id)),
        }
    }

    /// Reload favorites from the backend, replacing the local set
    pub async fn refresh_favorites(&self) -> Result<Vec<Recipe>> {
        let user_id = self.user_id()?;
        let records = self.bounded(self.api.user_recipes(user_id)).await?;
        let recipes: Vec<Recipe> = records.into_iter().map(Recipe::from_record).collect();
        let ids = recipes.iter().map(|r| r.id).collect();
        self.update_user(|u| u.favorite_recipe_ids = ids);
        Ok(recipes)
    }
}
