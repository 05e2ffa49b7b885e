use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::model::TooltipKind;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Signed-in user; bookmarks are only offered when set
    pub user: Option<String>,
    pub tooltip: TooltipKind,
    pub locale_file: Option<PathBuf>,
    pub share_base_url: String,
    pub bookmarks: Vec<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            user: None,
            tooltip: TooltipKind::Translation,
            locale_file: None,
            share_base_url: crate::widgets::share::DEFAULT_BASE_URL.to_string(),
            bookmarks: Vec::new(),
            log_level: "info".to_string(),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("Invalid config in {}", config_path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_bookmarked(&self, verse_key: &str) -> bool {
        self.bookmarks.iter().any(|k| k == verse_key)
    }

    /// Returns false if the verse was already bookmarked
    pub fn add_bookmark(&mut self, verse_key: &str) -> bool {
        if self.is_bookmarked(verse_key) {
            return false;
        }
        self.bookmarks.push(verse_key.to_string());
        true
    }

    /// Returns false if the verse was not bookmarked
    pub fn remove_bookmark(&mut self, verse_key: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|k| k != verse_key);
        self.bookmarks.len() != before
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("verse-view"))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
