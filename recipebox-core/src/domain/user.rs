//! User domain model

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::recipe::recipe_id_from_value;

/// Signed-in user as served by the "current user" endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    /// Favorited recipe ids (the backend sends either ids or recipe objects)
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub recipes: Vec<i64>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub allergies: Vec<i64>,
}

impl UserRecord {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            email: None,
            username: None,
            image_url: None,
            diet: None,
            recipes: Vec::new(),
            allergies: Vec::new(),
        }
    }

    /// Parse a "current user" response body
    ///
    /// `null` and `{}` both mean nobody is signed in.
    pub fn from_current_user_body(body: &JsonValue) -> serde_json::Result<Option<Self>> {
        match body {
            JsonValue::Null => Ok(None),
            JsonValue::Object(map) if map.is_empty() || !map.contains_key("id") => Ok(None),
            other => serde_json::from_value(other.clone()).map(Some),
        }
    }
}

fn deserialize_id_list<'de, D>(deserializer: D) -> std::result::Result<Vec<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Option<Vec<JsonValue>> = Option::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .iter()
        .filter_map(recipe_id_from_value)
        .collect())
}
