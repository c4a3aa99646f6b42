//! Markup description for rendered recipe cards
//!
//! Rendering produces these values instead of writing HTML into a live
//! document. `to_html` turns them into the Bootstrap card markup the page
//! expects; the page surface stores the bindings next to the HTML.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Total character budget shared by a card's title and summary excerpt
pub const CARD_TEXT_BUDGET: usize = 302;

/// Appended to every truncated summary
pub const ELLIPSIS: &str = "...";

/// Identifies one interactive control on the page
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ControlId(String);

impl ControlId {
    pub fn favorite(recipe_id: i64) -> Self {
        Self(format!("favorite-{}", recipe_id))
    }

    pub fn cart(recipe_id: i64) -> Self {
        Self(format!("cart-{}", recipe_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a control id such as `favorite-42`
    pub fn parse(raw: &str) -> Option<Self> {
        let (kind, id) = raw.split_once('-')?;
        id.parse::<i64>().ok()?;
        match kind {
            "favorite" | "cart" => Some(Self(raw.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a control does when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "recipe_id", rename_all = "snake_case")]
pub enum ControlAction {
    ToggleFavorite(i64),
    ToggleCart(i64),
}

impl ControlAction {
    pub fn recipe_id(self) -> i64 {
        match self {
            ControlAction::ToggleFavorite(id) | ControlAction::ToggleCart(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Success,
    Danger,
}

impl ButtonStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            ButtonStyle::Success => "btn-success",
            ButtonStyle::Danger => "btn-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteButton {
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartButton {
    /// Icon carries the `cart-item` marker
    pub active: bool,
    pub disabled: bool,
}

/// One rendered recipe card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCard {
    pub recipe_id: i64,
    pub title: String,
    pub image: String,
    pub summary_excerpt: String,
    pub details_href: String,
    pub favorite: FavoriteButton,
    pub cart: Option<CartButton>,
}

impl RecipeCard {
    /// Enabled controls on this card and what they are bound to
    pub fn bindings(&self) -> Vec<(ControlId, ControlAction)> {
        let mut bindings = Vec::with_capacity(2);
        if !self.favorite.disabled {
            bindings.push((
                ControlId::favorite(self.recipe_id),
                ControlAction::ToggleFavorite(self.recipe_id),
            ));
        }
        if let Some(cart) = &self.cart {
            if !cart.disabled {
                bindings.push((
                    ControlId::cart(self.recipe_id),
                    ControlAction::ToggleCart(self.recipe_id),
                ));
            }
        }
        bindings
    }

    pub fn to_html(&self) -> String {
        let disabled = |flag: bool| if flag { " disabled" } else { "" };

        let cart_markup = match &self.cart {
            Some(cart) => format!(
                r#"<button type="button" class="btn btn-info cart-btn" id="{id}" data-recipe-id="{rid}"{dis}><i class="fa-solid fa-cart-shopping{active}"></i></button>"#,
                id = ControlId::cart(self.recipe_id),
                rid = self.recipe_id,
                dis = disabled(cart.disabled),
                active = if cart.active { " cart-item" } else { "" },
            ),
            None => String::new(),
        };

        format!(
            concat!(
                r#"<div class="col-3 mt-3 recipe">"#,
                r#"<div class="card">"#,
                r#"<img src="{image}" class="card-img-top" alt="Image of Recipe">"#,
                r#"<div class="card-body">"#,
                r#"<h5 class="card-title">{title}</h5>"#,
                r#"<p class="card-text">{summary}</p>"#,
                r#"<a href="{href}" class="btn btn-primary recipe-link-user">Details</a>"#,
                r#"<button type="button" class="btn {style} favorite-btn" id="{fav_id}" data-recipe-id="{rid}"{fav_dis}>{label}</button>"#,
                "{cart}",
                "</div></div></div>"
            ),
            image = escape_html(&self.image),
            title = escape_html(&self.title),
            summary = self.summary_excerpt,
            href = escape_html(&self.details_href),
            style = self.favorite.style.css_class(),
            fav_id = ControlId::favorite(self.recipe_id),
            rid = self.recipe_id,
            fav_dis = disabled(self.favorite.disabled),
            label = escape_html(&self.favorite.label),
            cart = cart_markup,
        )
    }
}

/// Rendered results: the cards in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsMarkup {
    pub cards: Vec<RecipeCard>,
}

impl ResultsMarkup {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, recipe_id: i64) -> Option<&RecipeCard> {
        self.cards.iter().find(|c| c.recipe_id == recipe_id)
    }

    pub fn card_mut(&mut self, recipe_id: i64) -> Option<&mut RecipeCard> {
        self.cards.iter_mut().find(|c| c.recipe_id == recipe_id)
    }

    /// Every enabled control across all cards
    pub fn bindings(&self) -> Vec<(ControlId, ControlAction)> {
        self.cards.iter().flat_map(RecipeCard::bindings).collect()
    }

    pub fn to_html(&self) -> String {
        self.cards.iter().map(RecipeCard::to_html).collect()
    }
}

/// Escape text for use in element content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(disabled: bool, cart: Option<CartButton>) -> RecipeCard {
        RecipeCard {
            recipe_id: 7,
            title: "Mac & Cheese".to_string(),
            image: "https://img.example.com/7.jpg".to_string(),
            summary_excerpt: "Creamy...".to_string(),
            details_href: "/recipes/7/details".to_string(),
            favorite: FavoriteButton {
                label: "Favorite".to_string(),
                style: ButtonStyle::Success,
                disabled,
            },
            cart,
        }
    }

    #[test]
    fn test_control_id_parse() {
        assert_eq!(ControlId::parse("favorite-12"), Some(ControlId::favorite(12)));
        assert_eq!(ControlId::parse("cart-3"), Some(ControlId::cart(3)));
        assert!(ControlId::parse("cart-x").is_none());
        assert!(ControlId::parse("details-3").is_none());
    }

    #[test]
    fn test_disabled_controls_have_no_bindings() {
        let c = card(
            true,
            Some(CartButton {
                active: false,
                disabled: true,
            }),
        );
        assert!(c.bindings().is_empty());
    }

    #[test]
    fn test_bindings_one_per_control() {
        let c = card(
            false,
            Some(CartButton {
                active: true,
                disabled: false,
            }),
        );
        let bindings = c.bindings();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].1, ControlAction::ToggleFavorite(7));
        assert_eq!(bindings[1].1, ControlAction::ToggleCart(7));
    }

    #[test]
    fn test_html_escapes_title() {
        let html = card(false, None).to_html();
        assert!(html.contains("Mac &amp; Cheese"));
        assert!(html.contains(r#"class="btn btn-success favorite-btn""#));
        assert!(!html.contains("cart-btn"));
    }

    #[test]
    fn test_html_cart_marker() {
        let html = card(
            false,
            Some(CartButton {
                active: true,
                disabled: false,
            }),
        )
        .to_html();
        assert!(html.contains("fa-cart-shopping cart-item"));
        assert!(html.contains(r#"data-recipe-id="7""#));
    }
}
