//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod recipe_api;
mod results_view;

pub use recipe_api::{CartToggleAck, RecipeApi};
pub use results_view::ResultsView;
