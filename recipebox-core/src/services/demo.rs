//! Demo service - manage demo mode
//!
//! Demo mode swaps the HTTP backend for the in-memory demo catalogue. The
//! demo user's favorites and cart are kept in `demo_state.json` so they
//! survive between CLI invocations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::demo::DemoRecipeApi;
use crate::config::Config;

pub const DEMO_STATE_FILE: &str = "demo_state.json";

/// Favorites the demo user starts with
const SEED_FAVORITES: &[i64] = &[1002];

/// Persisted demo user state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoState {
    #[serde(default)]
    pub favorites: Vec<i64>,
    #[serde(default)]
    pub cart: Vec<i64>,
}

impl DemoState {
    fn seeded() -> Self {
        Self {
            favorites: SEED_FAVORITES.to_vec(),
            cart: Vec::new(),
        }
    }
}

/// Demo service for managing demo mode
pub struct DemoService {
    recipebox_dir: PathBuf,
}

impl DemoService {
    pub fn new(recipebox_dir: &Path) -> Self {
        Self {
            recipebox_dir: recipebox_dir.to_path_buf(),
        }
    }

    fn state_path(&self) -> PathBuf {
        self.recipebox_dir.join(DEMO_STATE_FILE)
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.recipebox_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode with a freshly seeded demo user
    pub fn enable(&self) -> Result<()> {
        let mut config = Config::load(&self.recipebox_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.recipebox_dir)?;
        self.save_state(&DemoState::seeded())
    }

    /// Disable demo mode, optionally dropping the demo user state
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.recipebox_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.recipebox_dir)?;

        let state_path = self.state_path();
        if clean && state_path.exists() {
            std::fs::remove_file(&state_path)
                .with_context(|| format!("Failed to remove {}", state_path.display()))?;
        }
        Ok(())
    }

    /// Stored demo state, or the seed when none exists yet
    pub fn load_state(&self) -> Result<DemoState> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(DemoState::seeded());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(serde_json::from_str(&content).unwrap_or_else(|_| DemoState::seeded()))
    }

    pub fn save_state(&self, state: &DemoState) -> Result<()> {
        std::fs::create_dir_all(&self.recipebox_dir)?;
        let path = self.state_path();
        std::fs::write(&path, serde_json::to_string_pretty(state)?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Demo backend primed with the stored state
    pub fn load_api(&self) -> Result<DemoRecipeApi> {
        let state = self.load_state()?;
        Ok(DemoRecipeApi::new()
            .with_favorites(&state.favorites)
            .with_cart(&state.cart))
    }

    /// Persist the demo backend's current favorites and cart
    pub fn save_api(&self, api: &DemoRecipeApi) -> Result<()> {
        self.save_state(&DemoState {
            favorites: api.favorites().into_iter().collect(),
            cart: api.cart().into_iter().collect(),
        })
    }
}
