//! Recipe backend HTTP client
//!
//! Talks JSON to the recipe backend. The base URL comes from configuration
//! (`apiBaseUrl` / `RECIPEBOX_API_URL`), never from a per-environment constant.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::domain::{RecipeRecord, RecipeSummary, SearchCriteria, UserRecord};
use crate::ports::{CartToggleAck, RecipeApi};

// =============================================================================
// API Response Models
// =============================================================================

/// Wrapper for the random recipes response
#[derive(Debug, Deserialize)]
struct RandomResponse {
    #[serde(default)]
    recipes: Vec<RecipeRecord>,
}

/// Wrapper for the complex search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RecipeSummary>,
}

// =============================================================================
// HTTP Client
// =============================================================================

/// Recipe backend client
#[derive(Debug, Clone)]
pub struct HttpRecipeApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpRecipeApi {
    /// Create a client for the given base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            anyhow::bail!("Recipe API base URL cannot be empty");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, request: RequestBuilder) -> DomainResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;
        self.check_response_status(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> DomainResult<T> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| DomainError::Other(format!("Failed to parse {} response: {}", what, e)))
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::Timeout(self.timeout.as_secs())
        } else if error.is_connect() {
            DomainError::network(format!("Unable to connect to {}", self.base_url))
        } else {
            DomainError::network(format!("Recipe API request failed: {}", error))
        }
    }

    /// Check response status and return appropriate errors
    fn check_response_status(&self, response: Response) -> DomainResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let path = response.url().path().to_string();
        match status {
            StatusCode::NOT_FOUND => Err(DomainError::not_found(path)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DomainError::backend(
                status.as_u16(),
                "Not authorized. Please log in again.",
            )),
            _ => Err(DomainError::backend(
                status.as_u16(),
                format!("Recipe API error on {}", path),
            )),
        }
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn random_recipes(&self) -> DomainResult<Vec<RecipeRecord>> {
        let body: RandomResponse = self
            .send_json(self.request(Method::GET, "/recipes/random"), "random recipes")
            .await?;
        Ok(body.recipes)
    }

    async fn complex_search(&self, criteria: &SearchCriteria) -> DomainResult<Vec<RecipeSummary>> {
        let request = self
            .request(Method::GET, "/recipes/complexSearch")
            .query(&criteria.query_pairs());
        let body: SearchResponse = self.send_json(request, "search").await?;
        Ok(body.results)
    }

    async fn recipes_info(&self, ids: &[i64]) -> DomainResult<Vec<RecipeRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .request(Method::POST, "/recipes/info")
            .json(&json!({ "ids": ids }));
        self.send_json(request, "recipe info").await
    }

    async fn recipe_information(&self, id: i64) -> DomainResult<RecipeRecord> {
        let path = format!("/recipes/{}/information", id);
        self.send_json(self.request(Method::GET, &path), "recipe information")
            .await
    }

    async fn current_user(&self) -> DomainResult<Option<UserRecord>> {
        let body: JsonValue = match self
            .send_json(self.request(Method::GET, "/users/current"), "current user")
            .await
        {
            Ok(body) => body,
            // The backend answers 404 when nobody is signed in
            Err(DomainError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(UserRecord::from_current_user_body(&body)?)
    }

    async fn user_recipes(&self, user_id: i64) -> DomainResult<Vec<RecipeRecord>> {
        let path = format!("/users/{}/recipes", user_id);
        self.send_json(self.request(Method::GET, &path), "favorites")
            .await
    }

    async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> DomainResult<()> {
        let path = format!("/users/{}/recipes", user_id);
        let request = self
            .request(Method::POST, &path)
            .json(&json!({ "recipe_id": recipe_id }));
        self.send(request).await?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> DomainResult<()> {
        let path = format!("/users/{}/recipes", user_id);
        let request = self
            .request(Method::DELETE, &path)
            .json(&json!({ "recipe_id": recipe_id }));
        self.send(request).await?;
        Ok(())
    }

    async fn user_cart(&self, user_id: i64) -> DomainResult<Vec<i64>> {
        let path = format!("/users/{}/cart", user_id);
        self.send_json(self.request(Method::GET, &path), "cart")
            .await
    }

    async fn toggle_cart(&self, user_id: i64, recipe_id: i64) -> DomainResult<CartToggleAck> {
        let path = format!("/users/{}/cart", user_id);
        let request = self
            .request(Method::PATCH, &path)
            .json(&json!({ "recipe_id": recipe_id }));
        let body: JsonValue = self.send_json(request, "cart toggle").await?;
        // Tolerate bodies that are not objects (e.g. a bare string)
        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}
