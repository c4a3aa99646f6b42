//! Mock recipe backend for testing
//!
//! A small threaded HTTP server that speaks the same JSON as the real
//! backend, so `HttpRecipeApi` can be exercised end to end:
//! - GET /recipes/random returns { recipes: [...] }
//! - GET /recipes/complexSearch returns { results: [...] }
//! - POST /recipes/info returns [...]
//! - GET /users/current returns the user, or 404 when signed out
//! - /users/{id}/recipes and /users/{id}/cart keep state between requests

use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value as JsonValue};

/// Mock recipe backend
pub struct MockRecipeServer {
    port: u16,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<MockState>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Configuration for the mock backend
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Number of recipes in the catalogue
    pub num_recipes: usize,
    /// Whether /users/current returns a user
    pub signed_in: bool,
    /// Force this status on /users/current
    pub current_user_status: Option<u16>,
    /// Force this status on every mutation (POST/DELETE/PATCH on /users)
    pub mutation_status: Option<u16>,
    /// Whether the cart PATCH reports the resulting membership
    pub cart_reports_membership: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            num_recipes: 6,
            signed_in: true,
            current_user_status: None,
            mutation_status: None,
            cart_reports_membership: true,
            delay_ms: 0,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    favorites: BTreeSet<i64>,
    cart: BTreeSet<i64>,
    requests: Vec<String>,
}

pub const MOCK_USER_ID: i64 = 1;

impl MockRecipeServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let state = Arc::new(Mutex::new(MockState::default()));

        // Non-blocking so the accept loop can observe shutdown
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let state_clone = state.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let state = state_clone.clone();
                        thread::spawn(move || handle_connection(stream, &cfg, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            state,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Pre-populate server-side favorites
    pub fn seed_favorites(&self, ids: &[i64]) {
        self.state.lock().unwrap().favorites.extend(ids);
    }

    /// Pre-populate the server-side cart
    pub fn seed_cart(&self, ids: &[i64]) {
        self.state.lock().unwrap().cart.extend(ids);
    }

    pub fn favorites(&self) -> BTreeSet<i64> {
        self.state.lock().unwrap().favorites.clone()
    }

    pub fn cart(&self) -> BTreeSet<i64> {
        self.state.lock().unwrap().cart.clone()
    }

    /// Requests received so far, as "METHOD /path"
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockRecipeServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read one HTTP request: head plus Content-Length bytes of body
fn read_request(stream: &mut TcpStream) -> Option<(String, String, String)> {
    stream.set_nonblocking(false).ok()?;
    let mut data = Vec::new();
    let mut buffer = [0; 4096];

    let head_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < head_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    let body = String::from_utf8_lossy(&data[head_end..]).to_string();
    let mut parts = head.lines().next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();
    Some((method, path, body))
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, state: &Mutex<MockState>) {
    let Some((method, path, body)) = read_request(&mut stream) else {
        send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid request"}"#);
        return;
    };

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let path_without_query = path.split('?').next().unwrap_or(&path).to_string();
    state
        .lock()
        .unwrap()
        .requests
        .push(format!("{} {}", method, path_without_query));

    let segments: Vec<&str> = path_without_query
        .trim_matches('/')
        .split('/')
        .collect();
    let body: JsonValue = serde_json::from_str(&body).unwrap_or(JsonValue::Null);

    let is_mutation = segments.first() == Some(&"users") && method != "GET";
    if is_mutation {
        if let Some(status) = config.mutation_status {
            send_response(&mut stream, status, "Error", r#"{"error": "mutation failed"}"#);
            return;
        }
    }

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["recipes", "random"]) => {
            let recipes: Vec<JsonValue> =
                (1..=config.num_recipes as i64).map(full_recipe).collect();
            send_json(&mut stream, &json!({ "recipes": recipes }));
        }
        ("GET", ["recipes", "complexSearch"]) => {
            // "nothing" as an ingredient yields no results
            let results: Vec<JsonValue> = if path.contains("includeIngredients=nothing") {
                Vec::new()
            } else {
                (1..=config.num_recipes.min(3) as i64)
                    .map(|id| json!({ "id": id, "title": format!("Recipe {}", id) }))
                    .collect()
            };
            send_json(&mut stream, &json!({ "results": results }));
        }
        ("POST", ["recipes", "info"]) => {
            let ids: Vec<i64> = body["ids"]
                .as_array()
                .map(|ids| ids.iter().filter_map(JsonValue::as_i64).collect())
                .unwrap_or_default();
            let recipes: Vec<JsonValue> = ids.into_iter().map(full_recipe).collect();
            send_json(&mut stream, &JsonValue::Array(recipes));
        }
        ("GET", ["recipes", id, "information"]) => match id.parse::<i64>() {
            Ok(id) => send_json(&mut stream, &full_recipe(id)),
            Err(_) => send_response(&mut stream, 404, "Not Found", r#"{"error": "no recipe"}"#),
        },
        ("GET", ["users", "current"]) => {
            if let Some(status) = config.current_user_status {
                send_response(&mut stream, status, "Error", r#"{"error": "forced"}"#);
            } else if config.signed_in {
                let favorites: Vec<i64> = state.lock().unwrap().favorites.iter().copied().collect();
                send_json(
                    &mut stream,
                    &json!({
                        "id": MOCK_USER_ID,
                        "email": "cook@example.com",
                        "username": "cook",
                        "image_url": null,
                        "diet": "none",
                        "recipes": favorites,
                        "allergies": []
                    }),
                );
            } else {
                send_response(&mut stream, 404, "Not Found", "null");
            }
        }
        ("GET", ["users", _, "recipes"]) => {
            let favorites: Vec<JsonValue> = state
                .lock()
                .unwrap()
                .favorites
                .iter()
                .map(|id| full_recipe(*id))
                .collect();
            send_json(&mut stream, &JsonValue::Array(favorites));
        }
        ("POST", ["users", _, "recipes"]) => match body["recipe_id"].as_i64() {
            Some(id) => {
                state.lock().unwrap().favorites.insert(id);
                send_json(&mut stream, &json!({ "Result": "Saved" }));
            }
            None => send_response(&mut stream, 400, "Bad Request", r#"{"error": "recipe_id"}"#),
        },
        ("DELETE", ["users", _, "recipes"]) => match body["recipe_id"].as_i64() {
            Some(id) => {
                state.lock().unwrap().favorites.remove(&id);
                send_json(&mut stream, &json!({ "Result": "Deleted" }));
            }
            None => send_response(&mut stream, 400, "Bad Request", r#"{"error": "recipe_id"}"#),
        },
        ("GET", ["users", _, "cart"]) => {
            let cart: Vec<i64> = state.lock().unwrap().cart.iter().copied().collect();
            send_json(&mut stream, &json!(cart));
        }
        ("PATCH", ["users", _, "cart"]) => match body["recipe_id"].as_i64() {
            Some(id) => {
                let in_cart = {
                    let mut guard = state.lock().unwrap();
                    if !guard.cart.remove(&id) {
                        guard.cart.insert(id);
                        true
                    } else {
                        false
                    }
                };
                let ack = if config.cart_reports_membership {
                    json!({ "Result": "Added/Removed from cart", "in_cart": in_cart })
                } else {
                    json!({ "Result": "Added/Removed from cart" })
                };
                send_json(&mut stream, &ack);
            }
            None => send_response(&mut stream, 400, "Bad Request", r#"{"error": "recipe_id"}"#),
        },
        _ => send_response(
            &mut stream,
            404,
            "Not Found",
            r#"{"error": "Endpoint not found"}"#,
        ),
    }
}

fn full_recipe(id: i64) -> JsonValue {
    json!({
        "id": id,
        "title": format!("Recipe {}", id),
        "cuisines": ["Italian"],
        "summary": format!("Summary of <b>recipe {}</b>.", id),
        "instructions": "<ol><li>Cook.</li></ol>",
        "sourceUrl": format!("https://recipes.example.com/{}", id),
        "readyInMinutes": 30,
        "image": format!("https://img.example.com/{}.jpg", id)
    })
}

fn send_json(stream: &mut TcpStream, body: &JsonValue) {
    send_response(stream, 200, "OK", &body.to_string());
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapters::http::HttpRecipeApi;
    use crate::domain::result::Error;
    use crate::domain::SearchCriteria;
    use crate::ports::RecipeApi;

    fn client(server: &MockRecipeServer) -> HttpRecipeApi {
        HttpRecipeApi::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_random_recipes() {
        let server = MockRecipeServer::start(MockConfig::default()).unwrap();
        let recipes = client(&server).random_recipes().await.unwrap();
        assert_eq!(recipes.len(), 6);
        assert_eq!(recipes[0].ready_in_minutes, 30);
    }

    #[tokio::test]
    async fn test_search_sends_query_and_bulk_info() {
        let server = MockRecipeServer::start(MockConfig::default()).unwrap();
        let api = client(&server);
        let criteria = SearchCriteria {
            include_ingredients: ["rice".to_string()].into_iter().collect(),
            ..Default::default()
        };

        let summaries = api.complex_search(&criteria).await.unwrap();
        assert_eq!(summaries.len(), 3);

        let ids: Vec<i64> = summaries.iter().map(|s| s.id).collect();
        let full = api.recipes_info(&ids).await.unwrap();
        assert_eq!(full.len(), 3);
        assert_eq!(full[2].id, 3);

        let requests = server.requests();
        assert!(requests.contains(&"GET /recipes/complexSearch".to_string()));
        assert!(requests.contains(&"POST /recipes/info".to_string()));
    }

    #[tokio::test]
    async fn test_signed_out_is_none() {
        let server = MockRecipeServer::start(MockConfig {
            signed_in: false,
            ..Default::default()
        })
        .unwrap();
        assert!(client(&server).current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_user_server_error() {
        let server = MockRecipeServer::start(MockConfig {
            current_user_status: Some(500),
            ..Default::default()
        })
        .unwrap();
        let err = client(&server).current_user().await.unwrap_err();
        assert!(matches!(err, Error::Backend { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_favorites_round_trip() {
        let server = MockRecipeServer::start(MockConfig::default()).unwrap();
        let api = client(&server);

        api.add_favorite(MOCK_USER_ID, 4).await.unwrap();
        assert!(server.favorites().contains(&4));

        let user = api.current_user().await.unwrap().unwrap();
        assert_eq!(user.recipes, vec![4]);

        api.remove_favorite(MOCK_USER_ID, 4).await.unwrap();
        assert!(server.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_cart_toggle_reports_membership() {
        let server = MockRecipeServer::start(MockConfig::default()).unwrap();
        let api = client(&server);

        let ack = api.toggle_cart(MOCK_USER_ID, 2).await.unwrap();
        assert_eq!(ack.in_cart, Some(true));
        assert_eq!(api.user_cart(MOCK_USER_ID).await.unwrap(), vec![2]);

        let ack = api.toggle_cart(MOCK_USER_ID, 2).await.unwrap();
        assert_eq!(ack.in_cart, Some(false));
    }

    #[tokio::test]
    async fn test_mutation_failure_status() {
        let server = MockRecipeServer::start(MockConfig {
            mutation_status: Some(503),
            ..Default::default()
        })
        .unwrap();
        let err = client(&server).add_favorite(MOCK_USER_ID, 1).await.unwrap_err();
        assert!(err.is_transient());
        assert!(server.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = MockRecipeServer::start(MockConfig {
            delay_ms: 1500,
            ..Default::default()
        })
        .unwrap();
        let api = HttpRecipeApi::new(&server.base_url(), Duration::from_millis(200)).unwrap();
        let err = api.random_recipes().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "unexpected error: {}", err);
    }
}
