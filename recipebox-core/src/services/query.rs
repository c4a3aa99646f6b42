//! Search query builder - raw form input to search criteria

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{SearchCriteria, DIET_NONE};

fn token_pattern() -> &'static Regex {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    TOKENS.get_or_init(|| Regex::new(r"[a-zA-Z]+").expect("static regex"))
}

/// Turns the three search inputs into normalized criteria
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchQueryBuilder;

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw include/exclude/diet input
    pub fn parse(&self, raw_include: &str, raw_exclude: &str, raw_diet: &str) -> SearchCriteria {
        let diet = raw_diet.trim();
        SearchCriteria {
            include_ingredients: tokenize(raw_include),
            exclude_ingredients: tokenize(raw_exclude),
            diet: if diet.is_empty() {
                DIET_NONE.to_string()
            } else {
                diet.to_lowercase()
            },
        }
    }

    /// Whether the criteria call for the random-recipes fallback
    pub fn is_empty(&self, criteria: &SearchCriteria) -> bool {
        criteria.is_empty()
    }
}

/// Maximal runs of ASCII letters, lowercased
pub fn tokenize(raw: &str) -> BTreeSet<String> {
    token_pattern()
        .find_iter(raw)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}
