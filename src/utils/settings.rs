//! Settings and configuration utilities.
//!
//! This module provides functionality to read settings from
//! $HOME/.gerrit-squash/settings.json and use them as a fallback for
//! environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::git::{GitRepository, CONFIG_URL_KEY};

/// Environment variable naming the review server base URL.
pub const URL_ENV_VAR: &str = "GERRIT_SQUASH_URL";

/// Settings loaded from $HOME/.gerrit-squash/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default settings
        if !path.exists() {
            return Ok(Settings::default());
        }

        // Read and parse the settings file
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".gerrit-squash").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        // Try to get from actual environment first
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => {
                // Fall back to settings
                self.env.get(key).cloned()
            }
        }
    }
}

/// Returns an environment variable with fallback to settings. The settings
/// file is only read when the variable is unset; a file that cannot be read
/// or parsed is an error.
pub fn get_env_var(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(Settings::load()?.get_env_var(key)),
    }
}

/// Resolves the review server base URL: explicit value, then git config
/// `gerrit-squash.url`, then `GERRIT_SQUASH_URL` (environment or settings).
pub fn resolve_review_url(repo: &GitRepository, explicit: Option<&str>) -> Result<Option<String>> {
    if let Some(url) = explicit.map(str::trim).filter(|url| !url.is_empty()) {
        return Ok(Some(url.to_string()));
    }

    if let Some(url) = repo.config_string(CONFIG_URL_KEY)? {
        debug!("Review URL from git config {}", CONFIG_URL_KEY);
        return Ok(Some(url));
    }

    Ok(get_env_var(URL_ENV_VAR)?
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "env": {
                "GERRIT_SQUASH_URL": "ssh://review.example.com:29418"
            }
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        assert_eq!(
            settings.env.get("GERRIT_SQUASH_URL").unwrap(),
            "ssh://review.example.com:29418"
        );
    }

    #[test]
    fn missing_settings_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();

        assert!(settings.env.is_empty());
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();

        assert!(Settings::load_from_path(&settings_path).is_err());
    }

    #[test]
    fn settings_get_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(
            &settings_path,
            r#"{ "env": { "GERRIT_SQUASH_TEST_ONLY": "from_settings" } }"#,
        )
        .unwrap();
        let settings = Settings::load_from_path(&settings_path).unwrap();

        // Test fallback to settings
        assert_eq!(
            settings.get_env_var("GERRIT_SQUASH_TEST_ONLY").unwrap(),
            "from_settings"
        );

        // Test precedence - env var should take precedence
        env::set_var("GERRIT_SQUASH_TEST_ONLY", "from_env");
        assert_eq!(
            settings.get_env_var("GERRIT_SQUASH_TEST_ONLY").unwrap(),
            "from_env"
        );

        // Clean up
        env::remove_var("GERRIT_SQUASH_TEST_ONLY");
    }

    #[test]
    fn explicit_url_wins_over_config() {
        let temp_dir = TempDir::new().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();
        let repo = GitRepository::open_at(temp_dir.path()).unwrap();
        repo.set_config_string(CONFIG_URL_KEY, "https://configured.example.com")
            .unwrap();

        assert_eq!(
            resolve_review_url(&repo, Some("https://flag.example.com"))
                .unwrap()
                .as_deref(),
            Some("https://flag.example.com")
        );
        assert_eq!(
            resolve_review_url(&repo, Some("  ")).unwrap().as_deref(),
            Some("https://configured.example.com")
        );
    }
}
