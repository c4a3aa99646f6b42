//! Search criteria

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Diet value meaning "no diet filter"
pub const DIET_NONE: &str = "none";

/// Normalized search input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub include_ingredients: BTreeSet<String>,
    pub exclude_ingredients: BTreeSet<String>,
    pub diet: String,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            include_ingredients: BTreeSet::new(),
            exclude_ingredients: BTreeSet::new(),
            diet: DIET_NONE.to_string(),
        }
    }
}

impl SearchCriteria {
    /// True only when both ingredient sets are empty and no diet is chosen
    pub fn is_empty(&self) -> bool {
        self.include_ingredients.is_empty()
            && self.exclude_ingredients.is_empty()
            && self.diet == DIET_NONE
    }

    /// Query parameters for the filtered search endpoint
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let diet = if self.diet == DIET_NONE {
            String::new()
        } else {
            self.diet.clone()
        };
        vec![
            ("includeIngredients", join(&self.include_ingredients)),
            ("excludeIngredients", join(&self.exclude_ingredients)),
            ("diet", diet),
        ]
    }
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}
