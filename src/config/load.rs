use crate::config::types::{Config, SETTINGS_FILE};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    /// Loads settings from `settings.json` in the current working directory.
    pub fn new() -> Result<Self> {
        Self::from_file(Path::new(SETTINGS_FILE))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}
