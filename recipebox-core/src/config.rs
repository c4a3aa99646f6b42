//! Configuration management
//!
//! Settings live in `settings.json` inside the recipebox directory:
//! ```json
//! {
//!   "app": {
//!     "apiBaseUrl": "http://127.0.0.1:5000",
//!     "requestTimeoutSecs": 30,
//!     "loginPath": "/login",
//!     "demoMode": false
//!   }
//! }
//! ```
//! Keys this crate does not manage are kept as-is on save.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOGIN_PATH: &str = "/login";

pub const ENV_API_URL: &str = "RECIPEBOX_API_URL";
pub const ENV_DEMO_MODE: &str = "RECIPEBOX_DEMO_MODE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    login_path: Option<String>,
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Recipebox configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub login_path: String,
    pub demo_mode: bool,
    /// Set when the URL came from the environment; such values are not saved
    api_url_from_env: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            demo_mode: false,
            api_url_from_env: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

/// Check that a backend base URL is an absolute http(s) URL
pub fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).with_context(|| format!("Invalid URL: {}", raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Unsupported URL scheme '{}': use http or https", parsed.scheme());
    }
    if parsed.host_str().is_none() {
        bail!("URL has no host: {}", raw);
    }
    Ok(trimmed.to_string())
}

impl Config {
    /// Load config from the recipebox directory
    ///
    /// `RECIPEBOX_API_URL` and `RECIPEBOX_DEMO_MODE` override the file.
    pub fn load(recipebox_dir: &Path) -> Result<Self> {
        Self::load_with_env(recipebox_dir, |key| std::env::var(key).ok())
    }

    fn load_with_env(recipebox_dir: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = read_settings(&recipebox_dir.join(SETTINGS_FILE))?;
        let defaults = Self::default();

        let (api_base_url, api_url_from_env) = match env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            Some(url) => (validate_base_url(&url)?, true),
            None => (
                raw.app.api_base_url.clone().unwrap_or(defaults.api_base_url),
                false,
            ),
        };

        let demo_mode = env(ENV_DEMO_MODE)
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(raw.app.demo_mode);

        Ok(Self {
            api_base_url,
            request_timeout_secs: raw
                .app
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.request_timeout_secs),
            login_path: raw.app.login_path.clone().unwrap_or(defaults.login_path),
            demo_mode,
            api_url_from_env,
        })
    }

    /// Save config to the recipebox directory
    pub fn save(&self, recipebox_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(recipebox_dir)
            .with_context(|| format!("Failed to create {}", recipebox_dir.display()))?;
        let settings_path = recipebox_dir.join(SETTINGS_FILE);

        let mut settings = read_settings(&settings_path)?;
        if !self.api_url_from_env {
            settings.app.api_base_url = Some(self.api_base_url.clone());
        }
        settings.app.request_timeout_secs = Some(self.request_timeout_secs);
        settings.app.login_path = Some(self.login_path.clone());
        settings.app.demo_mode = self.demo_mode;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether the base URL is overridden by the environment
    pub fn api_url_from_env(&self) -> bool {
        self.api_url_from_env
    }

    pub fn set_api_base_url(&mut self, raw: &str) -> Result<()> {
        self.api_base_url = validate_base_url(raw)?;
        self.api_url_from_env = false;
        Ok(())
    }

    pub fn set_request_timeout(&mut self, secs: u64) -> Result<()> {
        if secs == 0 {
            bail!("Timeout must be at least one second");
        }
        self.request_timeout_secs = secs;
        Ok(())
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}
