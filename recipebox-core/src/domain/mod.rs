//! Core domain entities
//!
//! All view-state entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod criteria;
pub mod markup;
mod recipe;
mod session;
mod user;
pub mod result;

pub use criteria::{SearchCriteria, DIET_NONE};
pub use markup::{
    ButtonStyle, CartButton, ControlAction, ControlId, FavoriteButton, RecipeCard, ResultsMarkup,
};
pub use recipe::{strip_tags, Recipe, RecipeRecord, RecipeSummary};
pub use session::{CartState, FavoriteState, Session, UserSession};
pub use user::UserRecord;
