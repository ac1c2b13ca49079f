//! Configuration management for forgelink.
//!
//! Credentials come from environment variables first, with a TOML file as
//! fallback for non-secret fields. Config files live in platform-specific
//! locations:
//!
//! - **macOS/Linux**: `~/.config/forgelink/config.toml`
//! - **Windows**: `%APPDATA%\forgelink\config.toml`
//!
//! Environment variables always win over the file:
//! `BITBUCKET_USERNAME`, `BITBUCKET_APP_PASSWORD`, `JIRA_URL`,
//! `JIRA_EMAIL`, `JIRA_API_TOKEN`. Values are not validated beyond
//! presence; a bad credential surfaces as an API error at call time.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "forgelink";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bitbucket credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitbucket: Option<BitbucketConfig>,

    /// JIRA credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira: Option<JiraConfig>,
}

/// Bitbucket Cloud credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BitbucketConfig {
    /// Bitbucket username
    pub username: String,
    /// App password for Basic auth
    pub app_password: String,
}

/// JIRA Cloud credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraConfig {
    /// JIRA instance URL (e.g. <https://your-domain.atlassian.net>)
    pub url: String,
    /// Account email for Basic auth
    pub email: String,
    /// API token for Basic auth
    pub api_token: String,
}

impl Config {
    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Load configuration: file (if any) overlaid with environment variables.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Ok(path) => Self::load_from(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Overlay environment variables on top of whatever the file provided.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup; empty values count as unset.
    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let env = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let username = env("BITBUCKET_USERNAME");
        let app_password = env("BITBUCKET_APP_PASSWORD");
        if username.is_some() || app_password.is_some() {
            let bb = self.bitbucket.get_or_insert_with(BitbucketConfig::default);
            if let Some(v) = username {
                bb.username = v;
            }
            if let Some(v) = app_password {
                bb.app_password = v;
            }
        }

        let url = env("JIRA_URL");
        let email = env("JIRA_EMAIL");
        let api_token = env("JIRA_API_TOKEN");
        if url.is_some() || email.is_some() || api_token.is_some() {
            let jira = self.jira.get_or_insert_with(JiraConfig::default);
            if let Some(v) = url {
                jira.url = v;
            }
            if let Some(v) = email {
                jira.email = v;
            }
            if let Some(v) = api_token {
                jira.api_token = v;
            }
        }
    }

    /// Bitbucket credentials, or a config error naming what's missing.
    pub fn bitbucket(&self) -> Result<&BitbucketConfig> {
        self.bitbucket.as_ref().ok_or_else(|| {
            Error::Config(
                "Bitbucket credentials not configured \
                 (set BITBUCKET_USERNAME and BITBUCKET_APP_PASSWORD)"
                    .to_string(),
            )
        })
    }

    /// JIRA credentials, or a config error naming what's missing.
    pub fn jira(&self) -> Result<&JiraConfig> {
        self.jira.as_ref().ok_or_else(|| {
            Error::Config(
                "JIRA credentials not configured \
                 (set JIRA_URL, JIRA_EMAIL and JIRA_API_TOKEN)"
                    .to_string(),
            )
        })
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.bitbucket.is_none());
        assert!(config.jira.is_none());
        assert!(config.bitbucket().is_err());
        assert!(config.jira().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let config = Config {
            bitbucket: Some(BitbucketConfig {
                username: "dev".to_string(),
                app_password: "app-pass".to_string(),
            }),
            jira: None,
        };

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[bitbucket]"));
        assert!(contents.contains("username = \"dev\""));
        assert!(!contents.contains("[jira]"));

        let loaded = Config::load_from(&path).unwrap();
        let bb = loaded.bitbucket().unwrap();
        assert_eq!(bb.username, "dev");
        assert_eq!(bb.app_password, "app-pass");
    }

    #[test]
    fn test_load_nonexistent() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(config.bitbucket.is_none());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            bitbucket: Some(BitbucketConfig {
                username: "file-user".to_string(),
                app_password: "file-pass".to_string(),
            }),
            jira: Some(JiraConfig {
                url: "https://file.atlassian.net".to_string(),
                email: "file@acme.io".to_string(),
                api_token: "file-token".to_string(),
            }),
        };

        config.apply_env_with(|key| match key {
            "BITBUCKET_USERNAME" => Some("env-user".to_string()),
            "JIRA_URL" => Some("https://env.atlassian.net".to_string()),
            _ => None,
        });

        let bb = config.bitbucket().unwrap();
        assert_eq!(bb.username, "env-user");
        // Untouched fields keep their file values.
        assert_eq!(bb.app_password, "file-pass");

        let jira = config.jira().unwrap();
        assert_eq!(jira.url, "https://env.atlassian.net");
        assert_eq!(jira.email, "file@acme.io");
        assert_eq!(jira.api_token, "file-token");
    }

    #[test]
    fn test_env_creates_sections_when_file_has_none() {
        let mut config = Config::default();

        config.apply_env_with(|key| match key {
            "BITBUCKET_USERNAME" => Some("dev".to_string()),
            "BITBUCKET_APP_PASSWORD" => Some("app-pass".to_string()),
            _ => None,
        });

        let bb = config.bitbucket().unwrap();
        assert_eq!(bb.username, "dev");
        assert_eq!(bb.app_password, "app-pass");
        assert!(config.jira().is_err());
    }

    #[test]
    fn test_empty_env_value_is_unset() {
        let mut config = Config {
            bitbucket: Some(BitbucketConfig {
                username: "file-user".to_string(),
                app_password: "file-pass".to_string(),
            }),
            jira: None,
        };

        config.apply_env_with(|key| match key {
            "BITBUCKET_USERNAME" => Some(String::new()),
            "JIRA_URL" => Some(String::new()),
            _ => None,
        });

        // An empty override must not clobber the file value.
        assert_eq!(config.bitbucket().unwrap().username, "file-user");
        // Nor conjure up a section on its own.
        assert!(config.jira.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            bitbucket: None,
            jira: Some(JiraConfig {
                url: "https://acme.atlassian.net".to_string(),
                email: "dev@acme.io".to_string(),
                api_token: "token".to_string(),
            }),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[jira]"));
        assert!(!toml_str.contains("[bitbucket]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        let jira = parsed.jira().unwrap();
        assert_eq!(jira.url, "https://acme.atlassian.net");
        assert_eq!(jira.email, "dev@acme.io");
    }
}
