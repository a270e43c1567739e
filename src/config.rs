//! Platform-specific paths and user settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::api::Endpoints;
use crate::chat::DEFAULT_INACTIVITY_MINUTES;
use crate::inventory::rows::DEFAULT_INITIAL_ROWS;
use crate::sales::dashboard::{
    DEFAULT_STOCK_THRESHOLD, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT, PAGE_SIZE,
};

/// Environment variable that overrides the API base URL from the settings file
pub const API_BASE_ENV: &str = "STOCKUP_API_BASE_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Get the stockup data directory
/// - macOS: ~/Library/Application Support/stockup/
/// - Linux: ~/.local/share/stockup/
/// - Windows: %APPDATA%/stockup/
pub fn data_dir() -> Result<PathBuf> {
    let data = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data.join("stockup"))
}

/// Stored login tokens
pub fn session_file() -> Result<PathBuf> {
    Ok(data_dir()?.join("session.json"))
}

pub fn settings_file() -> Result<PathBuf> {
    Ok(data_dir()?.join("config.json"))
}

/// Optional `config.json`; every key may be left out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_base_url: String,
    /// Blank rows shown when the bulk entry form opens
    pub initial_rows: usize,
    pub page_size: u32,
    pub top_limit: u32,
    pub stock_threshold: i64,
    pub chat_inactivity_minutes: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            initial_rows: DEFAULT_INITIAL_ROWS,
            page_size: PAGE_SIZE,
            top_limit: DEFAULT_TOP_LIMIT,
            stock_threshold: DEFAULT_STOCK_THRESHOLD,
            chat_inactivity_minutes: DEFAULT_INACTIVITY_MINUTES,
        }
    }
}

impl Settings {
    /// Read settings from a file; a missing file gives the defaults
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
        Ok(settings.normalized())
    }

    /// Settings from the data directory with the environment override applied
    pub fn load() -> Result<Self> {
        let settings = Self::read(&settings_file()?)?;
        Ok(settings.with_base_override(std::env::var(API_BASE_ENV).ok()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write: {}", path.display()))
    }

    /// Replace the API base URL when a non-blank override is given
    pub fn with_base_override(mut self, base: Option<String>) -> Self {
        if let Some(base) = base.filter(|b| !b.trim().is_empty()) {
            debug!(%base, "API base URL taken from environment");
            self.api_base_url = base;
        }
        self
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(&self.api_base_url)
    }

    fn normalized(mut self) -> Self {
        self.initial_rows = self.initial_rows.max(1);
        self.page_size = self.page_size.max(1);
        self.top_limit = self.top_limit.clamp(1, MAX_TOP_LIMIT);
        self.stock_threshold = self.stock_threshold.max(0);
        self.chat_inactivity_minutes = self.chat_inactivity_minutes.max(1);
        self
    }
}
