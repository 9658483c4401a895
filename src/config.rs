//! Configuration management for CineDeck
//!
//! Handles config file loading/saving and access token lookup.
//! Config is stored at ~/.config/cinedeck/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::catalog::DEFAULT_BASE_URL;
use crate::controller::DEFAULT_DEBOUNCE;

/// Environment variable holding the catalog bearer token
pub const TOKEN_ENV: &str = "TMDB_ACCESS_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog bearer token (read access token)
    pub access_token: Option<String>,
    /// Catalog API root
    pub base_url: Option<String>,
    /// Search debounce in milliseconds
    pub debounce_ms: Option<u64>,
    /// Where the favorites record store lives
    pub favorites_path: Option<PathBuf>,
    #[serde(default)]
    pub dark_mode: bool,
}

impl Config {
    /// Get config file path (~/.config/cinedeck/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinedeck").join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`. A missing file is the default config.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Bearer token with fallback chain:
    /// 1. Environment variable TMDB_ACCESS_TOKEN
    /// 2. Token from config file
    pub fn access_token(&self) -> Result<String> {
        resolve_token(std::env::var(TOKEN_ENV).ok(), self.access_token.as_deref()).ok_or_else(
            || {
                anyhow::anyhow!(
                    "No access token: set {} or access_token in the config file",
                    TOKEN_ENV
                )
            },
        )
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE)
    }

    /// Favorites store file (~/.local/share/cinedeck/store.json by default)
    pub fn favorites_path(&self) -> PathBuf {
        self.favorites_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("cinedeck").join("store.json"))
                .unwrap_or_else(|| PathBuf::from("cinedeck-store.json"))
        })
    }
}

fn resolve_token(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.filter(|t| !t.trim().is_empty())
        .or_else(|| configured.filter(|t| !t.trim().is_empty()).map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.access_token.is_none());
        assert!(!config.dark_mode);
        assert_eq!(config.base_url(), "https://api.themoviedb.org/3");
        assert_eq!(config.debounce(), Duration::from_millis(1000));
    }

    #[test]
    fn test_resolve_token_prefers_env() {
        assert_eq!(
            resolve_token(Some("env".into()), Some("file")).as_deref(),
            Some("env")
        );
        assert_eq!(resolve_token(None, Some("file")).as_deref(), Some("file"));
        assert_eq!(resolve_token(Some(" ".into()), Some("file")).as_deref(), Some("file"));
        assert_eq!(resolve_token(None, None), None);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cinedeck").join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let config = Config {
            access_token: Some("token".into()),
            debounce_ms: Some(250),
            dark_mode: true,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debounce_ms = \"soon\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
