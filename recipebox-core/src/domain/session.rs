//! Session domain model

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::UserRecord;

/// Local mirror of a signed-in user's favorites and shopping cart
///
/// The sets reflect backend state as of the last successful call. Only the
/// session service mutates them, and only after the backend acknowledged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: i64,
    pub favorite_recipe_ids: BTreeSet<i64>,
    pub shopping_cart: BTreeSet<i64>,
}

impl UserSession {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Seed from a user record and the cart listing
    pub fn from_record(record: &UserRecord, cart: impl IntoIterator<Item = i64>) -> Self {
        Self {
            id: record.id,
            favorite_recipe_ids: record.recipes.iter().copied().collect(),
            shopping_cart: cart.into_iter().collect(),
        }
    }

    pub fn is_favorite(&self, recipe_id: i64) -> bool {
        self.favorite_recipe_ids.contains(&recipe_id)
    }

    pub fn is_in_cart(&self, recipe_id: i64) -> bool {
        self.shopping_cart.contains(&recipe_id)
    }

    pub(crate) fn set_favorite(&mut self, recipe_id: i64, favorite: bool) {
        if favorite {
            self.favorite_recipe_ids.insert(recipe_id);
        } else {
            self.favorite_recipe_ids.remove(&recipe_id);
        }
    }

    pub(crate) fn set_in_cart(&mut self, recipe_id: i64, in_cart: bool) {
        if in_cart {
            self.shopping_cart.insert(recipe_id);
        } else {
            self.shopping_cart.remove(&recipe_id);
        }
    }
}

/// Either a signed-in user or nobody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Session {
    Authenticated(UserSession),
    Anonymous,
}

impl Session {
    pub fn user(&self) -> Option<&UserSession> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Session::Anonymous)
    }

    /// Anonymous sessions never favorite anything
    pub fn is_favorite(&self, recipe_id: i64) -> bool {
        self.user().is_some_and(|u| u.is_favorite(recipe_id))
    }

    pub fn is_in_cart(&self, recipe_id: i64) -> bool {
        self.user().is_some_and(|u| u.is_in_cart(recipe_id))
    }
}

/// Favorite relation for one recipe after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteState {
    NotFavorite,
    Favorited,
}

impl FavoriteState {
    pub fn from_flag(favorite: bool) -> Self {
        if favorite {
            Self::Favorited
        } else {
            Self::NotFavorite
        }
    }

    pub fn is_favorite(self) -> bool {
        self == Self::Favorited
    }
}

/// Cart membership for one recipe after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    NotInCart,
    InCart,
}

impl CartState {
    pub fn from_flag(in_cart: bool) -> Self {
        if in_cart {
            Self::InCart
        } else {
            Self::NotInCart
        }
    }

    pub fn is_in_cart(self) -> bool {
        self == Self::InCart
    }
}
