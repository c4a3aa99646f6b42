//! Demo recipe backend
//!
//! An in-memory backend with a small fixed catalogue and one signed-in demo
//! user. Used by demo mode so the CLI works without a running server.

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::{RecipeRecord, RecipeSummary, SearchCriteria, UserRecord, DIET_NONE};
use crate::ports::{CartToggleAck, RecipeApi};

/// Id of the demo user
pub const DEMO_USER_ID: i64 = 1;

/// A catalogue entry: the record plus what search filters on
#[derive(Debug, Clone)]
pub struct DemoRecipe {
    pub record: RecipeRecord,
    pub ingredients: Vec<&'static str>,
    pub diets: Vec<&'static str>,
}

fn demo_recipe(
    id: i64,
    title: &str,
    cuisine: &str,
    minutes: i64,
    summary: &str,
    ingredients: Vec<&'static str>,
    diets: Vec<&'static str>,
) -> DemoRecipe {
    DemoRecipe {
        record: RecipeRecord {
            id,
            title: title.to_string(),
            cuisines: vec![cuisine.to_string()],
            summary: summary.to_string(),
            instructions: format!("<ol><li>Prepare the {}.</li><li>Serve.</li></ol>", title.to_lowercase()),
            source_url: format!("https://recipes.example.com/{}", id),
            ready_in_minutes: minutes,
            image: format!("https://img.example.com/recipes/{}-556x370.jpg", id),
        },
        ingredients,
        diets,
    }
}

/// Generate the demo catalogue
pub fn generate_demo_recipes() -> Vec<DemoRecipe> {
    vec![
        demo_recipe(
            1001,
            "Chicken Fried Rice",
            "Chinese",
            25,
            "Chicken Fried Rice is a <b>quick weeknight dinner</b> that uses up leftover rice.",
            vec!["chicken", "rice", "egg", "peas", "soy"],
            vec![],
        ),
        demo_recipe(
            1002,
            "Kale and White Bean Soup",
            "Italian",
            40,
            "A hearty <b>vegan</b> soup with kale, cannellini beans and garlic.",
            vec!["kale", "beans", "garlic", "onion", "tomato"],
            vec!["vegan", "vegetarian", "gluten free"],
        ),
        demo_recipe(
            1003,
            "Garlic Butter Salmon",
            "American",
            20,
            "Pan-seared salmon finished with <i>garlic butter</i> and lemon.",
            vec!["salmon", "garlic", "butter", "lemon"],
            vec!["gluten free", "pescetarian"],
        ),
        demo_recipe(
            1004,
            "Chickpea Curry",
            "Indian",
            35,
            "Creamy chickpea curry simmered in coconut milk with warm spices.",
            vec!["chickpeas", "coconut", "onion", "tomato", "rice"],
            vec!["vegan", "vegetarian"],
        ),
        demo_recipe(
            1005,
            "Beef Tacos",
            "Mexican",
            30,
            "Seasoned ground beef tacos with <b>fresh salsa</b>.",
            vec!["beef", "tortilla", "tomato", "onion", "cheese"],
            vec![],
        ),
        demo_recipe(
            1006,
            "Mushroom Risotto",
            "Italian",
            50,
            "Slow-stirred arborio rice with mushrooms and parmesan.",
            vec!["rice", "mushroom", "parmesan", "butter", "onion"],
            vec!["vegetarian", "gluten free"],
        ),
        demo_recipe(
            1007,
            "Peanut Noodles",
            "Thai",
            15,
            "Cold noodles tossed in a spicy peanut sauce.",
            vec!["noodles", "peanut", "soy", "lime"],
            vec!["vegetarian"],
        ),
        demo_recipe(
            1008,
            "Greek Salad",
            "Greek",
            10,
            "Tomato, cucumber, olives and feta with oregano vinaigrette.",
            vec!["tomato", "cucumber", "olives", "feta", "onion"],
            vec!["vegetarian", "gluten free"],
        ),
    ]
}

#[derive(Debug, Default)]
struct DemoState {
    favorites: BTreeSet<i64>,
    cart: BTreeSet<i64>,
    requests: Vec<String>,
}

/// In-memory recipe backend
#[derive(Debug)]
pub struct DemoRecipeApi {
    catalogue: Vec<DemoRecipe>,
    signed_in: bool,
    state: Mutex<DemoState>,
}

impl DemoRecipeApi {
    pub fn new() -> Self {
        Self {
            catalogue: generate_demo_recipes(),
            signed_in: true,
            state: Mutex::new(DemoState::default()),
        }
    }

    /// Backend with nobody signed in
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            ..Self::new()
        }
    }

    /// Pre-populate favorites
    pub fn with_favorites(self, ids: &[i64]) -> Self {
        self.lock().favorites.extend(ids);
        self
    }

    /// Pre-populate the cart
    pub fn with_cart(self, ids: &[i64]) -> Self {
        self.lock().cart.extend(ids);
        self
    }

    pub fn favorites(&self) -> BTreeSet<i64> {
        self.lock().favorites.clone()
    }

    pub fn cart(&self) -> BTreeSet<i64> {
        self.lock().cart.clone()
    }

    /// Calls received so far, e.g. "add_favorite 1002"
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DemoState> {
        // A panicked holder cannot leave the sets half-updated
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: String) {
        self.lock().requests.push(call);
    }

    fn find(&self, id: i64) -> Result<&DemoRecipe> {
        self.catalogue
            .iter()
            .find(|r| r.record.id == id)
            .ok_or_else(|| Error::not_found(format!("recipe {}", id)))
    }

    fn check_user(&self, user_id: i64) -> Result<()> {
        if self.signed_in && user_id == DEMO_USER_ID {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {}", user_id)))
        }
    }

    fn matches(recipe: &DemoRecipe, criteria: &SearchCriteria) -> bool {
        let has = |token: &String| {
            recipe
                .ingredients
                .iter()
                .any(|ingredient| ingredient.starts_with(token.as_str()))
        };
        let diet_ok = criteria.diet == DIET_NONE
            || recipe
                .diets
                .iter()
                .any(|d| d.eq_ignore_ascii_case(&criteria.diet));

        criteria.include_ingredients.iter().all(has)
            && !criteria.exclude_ingredients.iter().any(has)
            && diet_ok
    }
}

impl Default for DemoRecipeApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeApi for DemoRecipeApi {
    fn name(&self) -> &str {
        "demo"
    }

    async fn random_recipes(&self) -> Result<Vec<RecipeRecord>> {
        self.record("random_recipes".to_string());
        Ok(self.catalogue.iter().map(|r| r.record.clone()).collect())
    }

    async fn complex_search(&self, criteria: &SearchCriteria) -> Result<Vec<RecipeSummary>> {
        self.record("complex_search".to_string());
        Ok(self
            .catalogue
            .iter()
            .filter(|r| Self::matches(r, criteria))
            .map(|r| RecipeSummary {
                id: r.record.id,
                title: r.record.title.clone(),
                image: Some(r.record.image.clone()),
            })
            .collect())
    }

    async fn recipes_info(&self, ids: &[i64]) -> Result<Vec<RecipeRecord>> {
        self.record("recipes_info".to_string());
        Ok(ids
            .iter()
            .filter_map(|id| self.find(*id).ok())
            .map(|r| r.record.clone())
            .collect())
    }

    async fn recipe_information(&self, id: i64) -> Result<RecipeRecord> {
        self.record(format!("recipe_information {}", id));
        Ok(self.find(id)?.record.clone())
    }

    async fn current_user(&self) -> Result<Option<UserRecord>> {
        self.record("current_user".to_string());
        if !self.signed_in {
            return Ok(None);
        }
        let mut user = UserRecord::new(DEMO_USER_ID);
        user.username = Some("demo".to_string());
        user.email = Some("demo@example.com".to_string());
        user.recipes = self.lock().favorites.iter().copied().collect();
        Ok(Some(user))
    }

    async fn user_recipes(&self, user_id: i64) -> Result<Vec<RecipeRecord>> {
        self.record("user_recipes".to_string());
        self.check_user(user_id)?;
        let favorites = self.favorites();
        Ok(self
            .catalogue
            .iter()
            .filter(|r| favorites.contains(&r.record.id))
            .map(|r| r.record.clone())
            .collect())
    }

    async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        self.record(format!("add_favorite {}", recipe_id));
        self.check_user(user_id)?;
        self.lock().favorites.insert(recipe_id);
        Ok(())
    }

    async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        self.record(format!("remove_favorite {}", recipe_id));
        self.check_user(user_id)?;
        self.lock().favorites.remove(&recipe_id);
        Ok(())
    }

    async fn user_cart(&self, user_id: i64) -> Result<Vec<i64>> {
        self.record("user_cart".to_string());
        self.check_user(user_id)?;
        Ok(self.cart().into_iter().collect())
    }

    async fn toggle_cart(&self, user_id: i64, recipe_id: i64) -> Result<CartToggleAck> {
        self.record(format!("toggle_cart {}", recipe_id));
        self.check_user(user_id)?;
        let mut state = self.lock();
        let in_cart = if state.cart.remove(&recipe_id) {
            false
        } else {
            state.cart.insert(recipe_id);
            true
        };
        Ok(CartToggleAck {
            in_cart: Some(in_cart),
            message: Some("Added/Removed from cart".to_string()),
        })
    }
}
