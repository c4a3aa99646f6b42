//! Results renderer - recipes and session state to cards
//!
//! `render` is pure and recomputes every button from the session on each
//! call. The renderer owns the page surface: it is the only writer of the
//! results container and the error slot.

use crate::domain::markup::{CARD_TEXT_BUDGET, ELLIPSIS};
use crate::domain::{
    ButtonStyle, CartButton, ControlAction, FavoriteButton, Recipe, RecipeCard, ResultsMarkup,
    Session,
};
use crate::ports::ResultsView;

/// Message shown for empty searches and failed reads
pub const NO_RESULTS_MESSAGE: &str = "No recipes found. Please try again.";

/// Per-page render options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub show_cart_controls: bool,
}

/// Summary cut to the space left after the title, plus an ellipsis
///
/// Lengths count characters. A title at or over the budget leaves only the
/// ellipsis.
pub fn excerpt(title: &str, summary: &str) -> String {
    let budget = CARD_TEXT_BUDGET.saturating_sub(title.chars().count());
    let mut text: String = summary.chars().take(budget).collect();
    text.push_str(ELLIPSIS);
    text
}

fn favorite_button(favorited: bool, disabled: bool) -> FavoriteButton {
    let (label, style) = if favorited {
        ("Unfavorite", ButtonStyle::Danger)
    } else {
        ("Favorite", ButtonStyle::Success)
    };
    FavoriteButton {
        label: label.to_string(),
        style,
        disabled,
    }
}

fn cart_button(context: RenderContext, in_cart: bool, disabled: bool) -> Option<CartButton> {
    context.show_cart_controls.then_some(CartButton {
        active: in_cart,
        disabled,
    })
}

/// Card for one recipe under the given session
///
/// A control is disabled for Anonymous sessions and while its own toggle is
/// pending.
pub fn card(
    recipe: &Recipe,
    session: &Session,
    is_pending: impl Fn(ControlAction) -> bool,
    context: RenderContext,
) -> RecipeCard {
    let anonymous = session.is_anonymous();
    RecipeCard {
        recipe_id: recipe.id,
        title: recipe.title.clone(),
        image: recipe.image.clone(),
        summary_excerpt: excerpt(&recipe.title, &recipe.summary),
        details_href: recipe.details_href(),
        favorite: favorite_button(
            session.is_favorite(recipe.id),
            anonymous || is_pending(ControlAction::ToggleFavorite(recipe.id)),
        ),
        cart: cart_button(
            context,
            session.is_in_cart(recipe.id),
            anonymous || is_pending(ControlAction::ToggleCart(recipe.id)),
        ),
    }
}

/// Markup for a batch of recipes, in input order
pub fn render(
    recipes: &[Recipe],
    session: &Session,
    is_pending: impl Fn(ControlAction) -> bool,
    context: RenderContext,
) -> ResultsMarkup {
    ResultsMarkup {
        cards: recipes
            .iter()
            .map(|recipe| card(recipe, session, &is_pending, context))
            .collect(),
    }
}

/// Owner of the results container and error slot
pub struct ResultsRenderer<V: ResultsView> {
    view: V,
    current: ResultsMarkup,
    context: RenderContext,
}

impl<V: ResultsView> ResultsRenderer<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            current: ResultsMarkup::default(),
            context: RenderContext::default(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Markup currently in the container
    pub fn current(&self) -> &ResultsMarkup {
        &self.current
    }

    /// Render recipes and write them to the container
    pub fn show(
        &mut self,
        recipes: &[Recipe],
        session: &Session,
        is_pending: impl Fn(ControlAction) -> bool,
        context: RenderContext,
    ) {
        self.context = context;
        let markup = render(recipes, session, is_pending, context);
        self.reconcile(markup);
    }

    /// Write markup to the container and rebind every control
    ///
    /// Empty markup goes to the no-results path instead of rendering zero
    /// cards.
    pub fn reconcile(&mut self, markup: ResultsMarkup) {
        if markup.is_empty() {
            self.show_no_results();
            return;
        }
        self.view.replace_results(&markup);
        self.view.clear_error();
        self.current = markup;
    }

    /// Recompute one card's controls after a toggle
    pub fn refresh_controls(
        &mut self,
        recipe_id: i64,
        session: &Session,
        is_pending: impl Fn(ControlAction) -> bool,
    ) {
        let context = self.context;
        let Some(card) = self.current.card_mut(recipe_id) else {
            return;
        };
        let anonymous = session.is_anonymous();
        card.favorite = favorite_button(
            session.is_favorite(recipe_id),
            anonymous || is_pending(ControlAction::ToggleFavorite(recipe_id)),
        );
        card.cart = cart_button(
            context,
            session.is_in_cart(recipe_id),
            anonymous || is_pending(ControlAction::ToggleCart(recipe_id)),
        );
        self.view.replace_results(&self.current);
    }

    /// Show a message in the error slot, replacing any previous one
    pub fn show_error(&mut self, text: &str) {
        self.view.clear_error();
        self.view.show_error(text);
    }

    pub fn clear_error(&mut self) {
        self.view.clear_error();
    }

    /// Empty the container and show the no-results message once
    pub fn show_no_results(&mut self) {
        self.current = ResultsMarkup::default();
        self.view.clear_results();
        self.show_error(NO_RESULTS_MESSAGE);
    }

    /// Empty the container without a message, for lists that are
    /// legitimately empty
    pub fn show_empty(&mut self) {
        self.current = ResultsMarkup::default();
        self.view.clear_results();
        self.view.clear_error();
    }

    pub fn redirect(&mut self, path: &str) {
        self.current = ResultsMarkup::default();
        self.view.clear_results();
        self.view.redirect(path);
    }
}
