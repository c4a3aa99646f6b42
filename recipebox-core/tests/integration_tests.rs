//! Integration tests for recipebox-core page flows
//!
//! The backend is the in-memory demo catalogue wrapped in a scripted fake
//! that can fail, delay, or withhold cart membership on demand. Rendering,
//! session state and the page surface are all real.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use recipebox_core::adapters::demo::{DemoRecipeApi, DEMO_USER_ID};
use recipebox_core::adapters::page::MemoryPage;
use recipebox_core::domain::result::Result;
use recipebox_core::domain::{
    ControlId, FavoriteState, RecipeRecord, RecipeSummary, SearchCriteria, UserRecord,
};
use recipebox_core::ports::{CartToggleAck, RecipeApi, ResultsView};
use recipebox_core::services::{
    EntryPoint, LoggingService, PageKind, PageOutcome, RecipeSearchController, SessionService,
    ToggleOutcome, NO_RESULTS_MESSAGE, TOGGLE_FAILED_MESSAGE,
};
use recipebox_core::{Error, Session, UserSession};

// ============================================================================
// Scripted backend
// ============================================================================

/// Demo backend with switchable failures and latency
struct ScriptedApi {
    inner: DemoRecipeApi,
    fail_reads: AtomicBool,
    fail_mutations: AtomicBool,
    fail_identity: AtomicBool,
    report_cart: AtomicBool,
    delay_ms: AtomicU64,
}

impl ScriptedApi {
    fn new(inner: DemoRecipeApi) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            fail_identity: AtomicBool::new(false),
            report_cart: AtomicBool::new(true),
            delay_ms: AtomicU64::new(0),
        }
    }

    fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }

    fn mutation_calls(&self) -> usize {
        self.inner
            .requests()
            .iter()
            .filter(|r| {
                r.starts_with("add_favorite")
                    || r.starts_with("remove_favorite")
                    || r.starts_with("toggle_cart")
            })
            .count()
    }

    async fn pause(&self) {
        let ms = self.delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::backend(500, "injected read failure"));
        }
        Ok(())
    }

    fn check_mutation(&self) -> Result<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Error::network("injected mutation failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeApi for ScriptedApi {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn random_recipes(&self) -> Result<Vec<RecipeRecord>> {
        self.check_read()?;
        self.inner.random_recipes().await
    }

    async fn complex_search(&self, criteria: &SearchCriteria) -> Result<Vec<RecipeSummary>> {
        self.check_read()?;
        self.inner.complex_search(criteria).await
    }

    async fn recipes_info(&self, ids: &[i64]) -> Result<Vec<RecipeRecord>> {
        self.check_read()?;
        self.inner.recipes_info(ids).await
    }

    async fn recipe_information(&self, id: i64) -> Result<RecipeRecord> {
        self.pause().await;
        self.check_read()?;
        self.inner.recipe_information(id).await
    }

    async fn current_user(&self) -> Result<Option<UserRecord>> {
        if self.fail_identity.load(Ordering::SeqCst) {
            return Err(Error::network("connection refused"));
        }
        self.inner.current_user().await
    }

    async fn user_recipes(&self, user_id: i64) -> Result<Vec<RecipeRecord>> {
        self.check_read()?;
        self.inner.user_recipes(user_id).await
    }

    async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        self.check_mutation()?;
        self.inner.add_favorite(user_id, recipe_id).await
    }

    async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        self.pause().await;
        self.check_mutation()?;
        self.inner.remove_favorite(user_id, recipe_id).await
    }

    async fn user_cart(&self, user_id: i64) -> Result<Vec<i64>> {
        self.inner.user_cart(user_id).await
    }

    async fn toggle_cart(&self, user_id: i64, recipe_id: i64) -> Result<CartToggleAck> {
        self.pause().await;
        self.check_mutation()?;
        let mut ack = self.inner.toggle_cart(user_id, recipe_id).await?;
        if !self.report_cart.load(Ordering::SeqCst) {
            ack.in_cart = None;
        }
        Ok(ack)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    api: Arc<ScriptedApi>,
    sessions: Arc<SessionService>,
    controller: RecipeSearchController<MemoryPage>,
}

fn harness_with(demo: DemoRecipeApi, timeout: Duration) -> Harness {
    let api = Arc::new(ScriptedApi::new(demo));
    let sessions = Arc::new(SessionService::new(api.clone(), timeout));
    let controller =
        RecipeSearchController::new(api.clone(), Arc::clone(&sessions), MemoryPage::new(), "/login");
    Harness {
        api,
        sessions,
        controller,
    }
}

fn harness(demo: DemoRecipeApi) -> Harness {
    harness_with(demo, Duration::from_secs(5))
}

// ============================================================================
// Toggle Round Trips
// ============================================================================

/// Two toggles return the recipe to its original state with exactly two
/// backend mutations
#[tokio::test]
async fn test_double_favorite_toggle_restores_state() {
    let mut h = harness(DemoRecipeApi::new());
    h.controller.search("", "", "").await;
    let control = ControlId::favorite(1001);

    h.controller.dispatch(&control).await.unwrap();
    let outcome = h.controller.dispatch(&control).await.unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Favorite {
            recipe_id: 1001,
            state: FavoriteState::NotFavorite
        }
    );
    assert!(!h.sessions.is_favorite(1001));
    assert!(!h.api.inner.favorites().contains(&1001));
    assert_eq!(h.api.mutation_calls(), 2);
    assert_eq!(
        h.controller.renderer().current().card(1001).unwrap().favorite.label,
        "Favorite"
    );
}

#[tokio::test]
async fn test_double_cart_toggle_restores_state() {
    let mut h = harness(DemoRecipeApi::new().with_favorites(&[1003]));
    h.controller.show_favorites().await;
    let control = ControlId::cart(1003);

    h.controller.dispatch(&control).await.unwrap();
    assert!(h.sessions.is_in_cart(1003));
    let card = h.controller.renderer().current().card(1003).unwrap();
    assert_eq!(card.cart.as_ref().map(|c| c.active), Some(true));

    h.controller.dispatch(&control).await.unwrap();
    assert!(!h.sessions.is_in_cart(1003));
    assert_eq!(h.api.mutation_calls(), 2);
}

// ============================================================================
// Anonymous Sessions
// ============================================================================

#[tokio::test]
async fn test_anonymous_controls_disabled_and_inert() {
    let mut h = harness(DemoRecipeApi::signed_out());
    let outcome = h.controller.search("", "", "").await;
    assert!(matches!(outcome, PageOutcome::Rendered { .. }));
    assert_eq!(h.controller.session(), Session::Anonymous);

    let markup = h.controller.renderer().current();
    assert!(markup.cards.iter().all(|c| c.favorite.disabled));
    assert!(h.controller.view().bindings().is_empty());
    assert!(h.controller.view().results_html().contains(" disabled>"));

    let err = h.controller.dispatch(&ControlId::favorite(1001)).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = h.sessions.toggle_cart(1001).await.unwrap_err();
    assert!(matches!(err, Error::ReadOnlySession));
    assert_eq!(h.api.mutation_calls(), 0);
}

#[tokio::test]
async fn test_anonymous_favorites_page_redirects() {
    let mut h = harness(DemoRecipeApi::signed_out());
    let outcome = h.controller.show_favorites().await;

    assert_eq!(
        outcome,
        PageOutcome::Redirected {
            path: "/login".to_string()
        }
    );
    assert_eq!(h.controller.view().redirected_to(), Some("/login"));
    assert!(h.controller.view().results_html().is_empty());
    assert!(!h.api.inner.requests().iter().any(|r| r == "user_recipes"));
}

// ============================================================================
// Error Slot
// ============================================================================

#[tokio::test]
async fn test_zero_results_twice_single_message() {
    let mut h = harness(DemoRecipeApi::new());
    assert_eq!(h.controller.search("unobtainium", "", "").await, PageOutcome::NoResults);
    assert_eq!(h.controller.search("unobtainium", "", "").await, PageOutcome::NoResults);

    let doc = h.controller.view().to_document("Recipe Search");
    assert_eq!(doc.matches(NO_RESULTS_MESSAGE).count(), 1);
    assert_eq!(doc.matches("error_msg").count(), 1);
    assert!(h.controller.view().results_html().is_empty());
}

#[tokio::test]
async fn test_success_after_no_results_clears_message() {
    let mut h = harness(DemoRecipeApi::new());
    h.controller.search("unobtainium", "", "").await;
    let outcome = h.controller.search("rice", "", "vegetarian").await;

    assert_eq!(outcome, PageOutcome::Rendered { count: 2 });
    assert!(h.controller.view().error().is_none());
}

#[tokio::test]
async fn test_read_failure_shows_no_results() {
    let mut h = harness(DemoRecipeApi::new());
    h.controller.search("", "", "").await;
    ScriptedApi::set(&h.api.fail_reads, true);

    let outcome = h.controller.search("chicken", "", "").await;
    assert!(matches!(
        outcome,
        PageOutcome::ReadFailed { ref message } if message.contains("HTTP 500")
    ));
    assert_eq!(h.controller.view().error(), Some(NO_RESULTS_MESSAGE));
    assert!(h.controller.view().bindings().is_empty());
    assert!(h.controller.recipes().is_empty());
}

// ============================================================================
// Failed and Timed-out Toggles
// ============================================================================

#[tokio::test]
async fn test_failed_toggle_leaves_state_and_reenables() {
    let mut h = harness(DemoRecipeApi::new());
    h.controller.search("", "", "").await;
    ScriptedApi::set(&h.api.fail_mutations, true);

    let control = ControlId::favorite(1005);
    let err = h.controller.dispatch(&control).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));

    assert!(!h.sessions.is_favorite(1005));
    assert!(!h.sessions.pending(1005));
    assert_eq!(h.controller.view().error(), Some(TOGGLE_FAILED_MESSAGE));
    let card = h.controller.renderer().current().card(1005).unwrap();
    assert!(!card.favorite.disabled);
    assert_eq!(card.favorite.label, "Favorite");
    assert!(h.controller.view().binding(&control).is_some());

    // Retry once the backend recovers
    ScriptedApi::set(&h.api.fail_mutations, false);
    h.controller.dispatch(&control).await.unwrap();
    assert!(h.sessions.is_favorite(1005));
    assert!(h.controller.view().error().is_none());
}

#[tokio::test]
async fn test_timed_out_toggle_releases_guard() {
    let mut h = harness_with(DemoRecipeApi::new(), Duration::from_millis(50));
    h.controller.search("", "", "").await;
    h.api.delay_ms.store(500, Ordering::SeqCst);

    let control = ControlId::favorite(1002);
    let err = h.controller.dispatch(&control).await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
    assert!(!h.sessions.pending(1002));
    assert!(!h.sessions.is_favorite(1002));
    assert!(h.controller.view().binding(&control).is_some());

    h.api.delay_ms.store(0, Ordering::SeqCst);
    h.controller.dispatch(&control).await.unwrap();
    assert!(h.sessions.is_favorite(1002));
}

#[tokio::test]
async fn test_duplicate_toggle_rejected_while_pending() {
    let h = harness(DemoRecipeApi::new().with_favorites(&[1004]));
    h.sessions.resolve_current().await;
    h.api.delay_ms.store(50, Ordering::SeqCst);

    let (first, second) = tokio::join!(
        h.sessions.toggle_favorite(1004),
        h.sessions.toggle_favorite(1004)
    );

    assert_eq!(first.unwrap(), FavoriteState::NotFavorite);
    assert!(matches!(second, Err(Error::ToggleInFlight(1004))));
    assert_eq!(h.api.mutation_calls(), 1);
    assert!(!h.sessions.pending(1004));
}

/// Favorite and cart are separate controls with separate pending slots
#[tokio::test]
async fn test_favorite_and_cart_toggles_on_one_recipe_run_together() {
    let h = harness(DemoRecipeApi::new().with_favorites(&[1004]));
    h.sessions.resolve_current().await;
    h.api.delay_ms.store(50, Ordering::SeqCst);

    let (favorite, cart) = tokio::join!(
        h.sessions.toggle_favorite(1004),
        h.sessions.toggle_cart(1004)
    );

    assert_eq!(favorite.unwrap(), FavoriteState::NotFavorite);
    assert!(cart.unwrap().is_in_cart());
    assert_eq!(h.api.mutation_calls(), 2);
    assert!(!h.sessions.pending(1004));
}

#[tokio::test]
async fn test_toggles_on_different_recipes_run_together() {
    let h = harness(DemoRecipeApi::new());
    h.sessions.resolve_current().await;
    h.api.delay_ms.store(20, Ordering::SeqCst);

    let (a, b) = tokio::join!(h.sessions.toggle_cart(1001), h.sessions.toggle_cart(1002));
    assert!(a.unwrap().is_in_cart());
    assert!(b.unwrap().is_in_cart());
}

// ============================================================================
// Server Authority
// ============================================================================

/// The server's view of the cart wins over a stale local set
#[tokio::test]
async fn test_cart_membership_from_refetch_when_not_reported() {
    let h = harness(DemoRecipeApi::new().with_cart(&[1006]));
    // Local mirror predates the server-side add
    let sessions = SessionService::new(h.api.clone(), Duration::from_secs(5))
        .with_session(Session::Authenticated(UserSession::new(DEMO_USER_ID)));
    ScriptedApi::set(&h.api.report_cart, false);

    let state = sessions.toggle_cart(1006).await.unwrap();
    assert!(!state.is_in_cart());
    assert!(!sessions.is_in_cart(1006));
    assert!(h.api.inner.requests().iter().any(|r| r == "user_cart"));

    let state = sessions.toggle_cart(1006).await.unwrap();
    assert!(state.is_in_cart());
    assert!(sessions.is_in_cart(1006));
}

// ============================================================================
// Favorites Page
// ============================================================================

#[tokio::test]
async fn test_favorites_page_renders_cart_controls() {
    let mut h = harness(DemoRecipeApi::new().with_favorites(&[1001, 1007]).with_cart(&[1007]));
    let outcome = h.controller.show_favorites().await;

    assert_eq!(outcome, PageOutcome::Rendered { count: 2 });
    assert_eq!(h.controller.page(), PageKind::Favorites);
    let markup = h.controller.renderer().current();
    assert!(markup.cards.iter().all(|c| c.favorite.label == "Unfavorite"));
    assert_eq!(markup.card(1007).unwrap().cart.as_ref().map(|c| c.active), Some(true));
    assert_eq!(markup.card(1001).unwrap().cart.as_ref().map(|c| c.active), Some(false));
    assert_eq!(h.controller.view().bindings().len(), 4);
    assert!(h.controller.view().results_html().contains("cart-item"));
}

#[tokio::test]
async fn test_unfavorite_on_favorites_page_removes_card() {
    let mut h = harness(DemoRecipeApi::new().with_favorites(&[1001, 1007]));
    h.controller.show_favorites().await;

    h.controller.dispatch(&ControlId::favorite(1001)).await.unwrap();
    let markup = h.controller.renderer().current();
    assert_eq!(markup.cards.len(), 1);
    assert!(markup.card(1001).is_none());
    assert!(h.controller.view().binding(&ControlId::favorite(1001)).is_none());
    assert_eq!(h.controller.view().bindings().len(), 2);
}

#[tokio::test]
async fn test_favorites_read_failure_is_not_an_empty_list() {
    let mut h = harness(DemoRecipeApi::new().with_favorites(&[1001]));
    ScriptedApi::set(&h.api.fail_reads, true);

    let outcome = h.controller.show_favorites().await;
    match outcome {
        PageOutcome::ReadFailed { message } => assert!(message.contains("HTTP 500")),
        other => panic!("expected ReadFailed, got {:?}", other),
    }
    assert_eq!(h.controller.view().error(), Some(NO_RESULTS_MESSAGE));
    assert!(h.controller.recipes().is_empty());
}

#[tokio::test]
async fn test_no_favorites_renders_empty_page_without_message() {
    let mut h = harness(DemoRecipeApi::new());

    assert_eq!(h.controller.show_favorites().await, PageOutcome::Empty);
    assert!(h.controller.view().error().is_none());
    assert!(h.controller.view().results_html().is_empty());
    assert!(h.controller.view().bindings().is_empty());
}

#[tokio::test]
async fn test_unfavorite_last_card_leaves_empty_page() {
    let mut h = harness(DemoRecipeApi::new().with_favorites(&[1003]));
    h.controller.show_favorites().await;

    h.controller.dispatch(&ControlId::favorite(1003)).await.unwrap();
    assert!(h.controller.renderer().current().is_empty());
    assert!(h.controller.view().error().is_none());
}

// ============================================================================
// Session Resolution
// ============================================================================

#[tokio::test]
async fn test_identity_failure_is_anonymous_and_logged() {
    let logger = Arc::new(LoggingService::in_memory(EntryPoint::Cli, "test").unwrap());
    let api = Arc::new(ScriptedApi::new(DemoRecipeApi::new()));
    ScriptedApi::set(&api.fail_identity, true);
    let sessions =
        SessionService::new(api, Duration::from_secs(5)).with_logger(Some(Arc::clone(&logger)));

    assert_eq!(sessions.resolve_current().await, Session::Anonymous);

    let errors = logger.get_errors(10).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].event, "session_resolve_failed");
}

#[tokio::test]
async fn test_signed_out_is_anonymous_without_error() {
    let logger = Arc::new(LoggingService::in_memory(EntryPoint::Cli, "test").unwrap());
    let api = Arc::new(ScriptedApi::new(DemoRecipeApi::signed_out()));
    let sessions =
        SessionService::new(api, Duration::from_secs(5)).with_logger(Some(Arc::clone(&logger)));

    assert_eq!(sessions.resolve_current().await, Session::Anonymous);

    assert!(logger.get_errors(10).unwrap().is_empty());
    let recent = logger.get_recent(10).unwrap();
    assert!(recent.iter().any(|e| e.event == "session_anonymous"));
}
