//! Recipe backend port
//!
//! Defines the interface to the recipe backend (the Flask app that proxies
//! Spoonacular and stores favorites/cart). Services only see this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::{RecipeRecord, RecipeSummary, SearchCriteria, UserRecord};

/// Body of the cart toggle acknowledgment
///
/// Newer backends report the resulting membership; older ones only send a
/// human-readable `Result` string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartToggleAck {
    #[serde(default)]
    pub in_cart: Option<bool>,
    #[serde(default, rename = "Result")]
    pub message: Option<String>,
}

/// Recipe backend abstraction
///
/// Implementations (adapters) provide the actual transport.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Adapter name (e.g., "http", "demo")
    fn name(&self) -> &str;

    // === Recipes ===

    /// Random batch of full recipes
    async fn random_recipes(&self) -> Result<Vec<RecipeRecord>>;

    /// Filtered search, abbreviated records only
    async fn complex_search(&self, criteria: &SearchCriteria) -> Result<Vec<RecipeSummary>>;

    /// Full records for many ids in one round trip
    async fn recipes_info(&self, ids: &[i64]) -> Result<Vec<RecipeRecord>>;

    /// Full record for one id
    async fn recipe_information(&self, id: i64) -> Result<RecipeRecord>;

    // === Users ===

    /// Currently signed-in user, `None` when nobody is
    async fn current_user(&self) -> Result<Option<UserRecord>>;

    /// Full records for a user's favorites
    async fn user_recipes(&self, user_id: i64) -> Result<Vec<RecipeRecord>>;

    /// Add a favorite
    async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()>;

    /// Remove a favorite
    async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()>;

    /// Recipe ids in the user's shopping cart
    async fn user_cart(&self, user_id: i64) -> Result<Vec<i64>>;

    /// Flip server-side cart membership for a recipe
    async fn toggle_cart(&self, user_id: i64, recipe_id: i64) -> Result<CartToggleAck>;
}
