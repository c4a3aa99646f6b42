//! Recipe domain model
//!
//! The backend passes Spoonacular-shaped records through unchanged, so raw
//! records use camelCase keys and most fields may be absent. `Recipe` is the
//! normalized view model every other layer works with.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Full recipe record as returned by the information endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    #[serde(deserialize_with = "deserialize_recipe_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub cuisines: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub summary: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub instructions: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub source_url: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub ready_in_minutes: i64,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub image: String,
}

/// Abbreviated record returned by the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(deserialize_with = "deserialize_recipe_id")]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Normalized recipe view model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub cuisine: Vec<String>,
    /// HTML fragment
    pub summary: String,
    pub instructions: String,
    pub source_url: String,
    /// Minutes
    pub prep_time: i64,
    pub image: String,
}

impl Recipe {
    /// Build a view model from a raw record
    pub fn from_record(record: RecipeRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            cuisine: record.cuisines,
            summary: record.summary,
            instructions: record.instructions,
            source_url: record.source_url,
            prep_time: record.ready_in_minutes,
            image: record.image,
        }
    }

    /// Overwrite every field from a freshly fetched record
    ///
    /// The id is replaced too; callers fetch by id so the two agree.
    pub fn refresh_from(&mut self, record: RecipeRecord) {
        *self = Self::from_record(record);
    }

    /// Summary with HTML tags removed
    pub fn plain_summary(&self) -> String {
        strip_tags(&self.summary)
    }

    /// Instructions with HTML tags removed
    pub fn plain_instructions(&self) -> String {
        strip_tags(&self.instructions)
    }

    /// Relative link to the details page for this recipe
    pub fn details_href(&self) -> String {
        format!("/recipes/{}/details", self.id)
    }
}

impl From<RecipeRecord> for Recipe {
    fn from(record: RecipeRecord) -> Self {
        Self::from_record(record)
    }
}

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]+>").expect("static regex"))
}

/// Remove anything that looks like an HTML tag
pub fn strip_tags(html: &str) -> String {
    tag_pattern().replace_all(html, "").into_owned()
}

/// Deserialize an id that can be a number or a numeric string
pub(crate) fn deserialize_recipe_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    recipe_id_from_value(&value).ok_or_else(|| D::Error::custom("expected number or string for id"))
}

/// Extract a recipe id from a JSON number, numeric string, or `{ "id": .. }` object
pub(crate) fn recipe_id_from_value(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        JsonValue::Object(map) => map.get("id").and_then(recipe_id_from_value),
        _ => None,
    }
}

/// Treat an explicit `null` like a missing field
fn deserialize_nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
