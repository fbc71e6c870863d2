//! Extension configuration
//!
//! Configuration is read from TOML. The built-in defaults are compiled into the
//! binary; a user file (explicit path, or `config.toml` in the platform config
//! directory) replaces them as a whole. The user-agent override can also be
//! supplied through the `STREAMSCOUT_USER_AGENT` environment variable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Environment variable overriding `http.user_agent`
pub const USER_AGENT_ENV: &str = "STREAMSCOUT_USER_AGENT";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unexpected fields
    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The built-in defaults could not be parsed
    #[error("Built-in default config is invalid: {0}")]
    InvalidDefaults(#[from] toml::de::Error),
}

/// Top-level extension configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionConfig {
    pub catalog: CatalogConfig,
    pub providers: ProvidersConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Primary catalog endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Site root used for search, title pages and player iframes
    pub base_url: Url,
    /// Image CDN root; images live under `<cdn_url>/images/<filename>`
    pub cdn_url: Url,
    /// Language tag attached to every entry handed to the host
    pub language: String,
}

/// Secondary metadata providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub tmdb_url: Url,
    pub tmdb_primary_language: String,
    pub tmdb_fallback_language: String,
    pub imdb_url: Url,
    pub tvmaze_url: Url,
}

/// Outgoing HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-agent override; also forwarded on resolved video assets
    #[serde(default)]
    pub user_agent: Option<String>,
    pub timeout_secs: u64,
}

/// Static feed snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Directory holding `feed_collections.json` / `trending_shows.json`
    /// overrides for the bundled snapshots
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ExtensionConfig {
    /// Returns the built-in defaults
    pub fn defaults() -> Result<Self, ConfigError> {
        Ok(toml::from_str(DEFAULT_CONFIG)?)
    }

    /// Loads configuration from an explicit file, or from the user config file
    /// if one exists, falling back to the built-in defaults
    ///
    /// The `STREAMSCOUT_USER_AGENT` environment variable is applied on top of
    /// whichever source was used.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional explicit config file; it must exist when given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::user_config_path() {
                Some(user_path) if user_path.exists() => Self::from_file(&user_path)?,
                _ => Self::defaults()?,
            },
        };

        if let Ok(user_agent) = std::env::var(USER_AGENT_ENV) {
            config.apply_user_agent(Some(user_agent));
        }

        Ok(config)
    }

    /// Parses a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Replaces the user-agent override; blank values are ignored
    pub fn apply_user_agent(&mut self, user_agent: Option<String>) {
        if let Some(user_agent) = user_agent.filter(|ua| !ua.trim().is_empty()) {
            self.http.user_agent = Some(user_agent);
        }
    }

    /// Path to the user config file
    ///
    /// - Linux: ~/.config/streamscout/config.toml
    /// - macOS: ~/Library/Application Support/streamscout/config.toml
    /// - Windows: %APPDATA%\streamscout\config\config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "streamscout")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config = ExtensionConfig::defaults().unwrap();
        assert_eq!(config.catalog.language, "it");
        assert_eq!(config.providers.tmdb_primary_language, "it");
        assert_eq!(config.providers.tmdb_fallback_language, "en");
        assert_eq!(config.providers.tvmaze_url.as_str(), "https://api.tvmaze.com/");
        assert!(config.http.user_agent.is_none());
        assert!(config.feed.snapshot_dir.is_none());
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[catalog]
base_url = "http://localhost:8080/"
cdn_url = "http://localhost:8081/"
language = "en"

[providers]
tmdb_url = "http://localhost:9000/"
tmdb_primary_language = "en"
tmdb_fallback_language = "de"
imdb_url = "http://localhost:9001/"
tvmaze_url = "http://localhost:9002/"

[http]
user_agent = "Mozilla/5.0 (Test)"
timeout_secs = 5
"#
        )
        .unwrap();

        let config = ExtensionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.http.user_agent.as_deref(), Some("Mozilla/5.0 (Test)"));
        assert_eq!(config.feed, FeedConfig::default());
    }

    #[test]
    fn test_from_file_rejects_invalid_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[catalog]
base_url = "not a url"
cdn_url = "http://localhost:8081/"
language = "it"
"#
        )
        .unwrap();

        let result = ExtensionConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseFailed { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = ExtensionConfig::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_apply_user_agent_ignores_blank() {
        let mut config = ExtensionConfig::defaults().unwrap();
        config.apply_user_agent(Some("   ".to_string()));
        assert!(config.http.user_agent.is_none());

        config.apply_user_agent(Some("Teevi/1.0".to_string()));
        assert_eq!(config.http.user_agent.as_deref(), Some("Teevi/1.0"));

        config.apply_user_agent(None);
        assert_eq!(config.http.user_agent.as_deref(), Some("Teevi/1.0"));
    }
}
