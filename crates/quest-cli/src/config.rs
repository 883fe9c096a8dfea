//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use quest_ai::CompletionClient;

/// Configuration for quest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub completion: CompletionConfig,
}

/// HTTP server settings for `--serve` mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default 127.0.0.1)
    pub addr: Option<String>,
    /// Bind port (default 3030)
    pub port: Option<u16>,
}

/// Source lookup settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Sources fetched per turn (default 6)
    pub max_sources: Option<usize>,
}

/// Completion endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Chat-completions endpoint URL
    pub endpoint: Option<String>,
    /// Model identifier sent with each request
    pub model: Option<String>,
    /// Bearer token (alternative to the QUEST_API_KEY environment variable)
    pub api_key: Option<String>,
    /// Value for the customerId request header
    pub customer_id: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quest")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for QUEST_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("QUEST_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        Config::default().save()?;
        Ok(path)
    }

    /// Get the API key, checking config then environment
    pub fn api_key(&self) -> Option<String> {
        self.completion
            .api_key
            .clone()
            .or_else(|| std::env::var("QUEST_API_KEY").ok())
    }

    /// Sources fetched per turn
    pub fn max_sources(&self) -> usize {
        self.search.max_sources.unwrap_or(6)
    }

    /// Build the completion client this config describes
    pub fn completion_client(&self) -> CompletionClient {
        let mut client = CompletionClient::new();
        if let Some(ref endpoint) = self.completion.endpoint {
            client = client.with_endpoint(endpoint);
        }
        if let Some(ref model) = self.completion.model {
            client = client.with_model(model);
        }
        if let Some(key) = self.api_key() {
            client = client.with_api_key(key);
        }
        if let Some(ref customer_id) = self.completion.customer_id {
            client = client.with_customer_id(customer_id);
        }
        client
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# quest configuration file
# Place at ~/.config/quest/config.toml (Linux/Mac) or %APPDATA%\quest\config.toml (Windows)

[server]
# Bind address and port for --serve mode
# addr = "127.0.0.1"
# port = 3030

[search]
# Sources fetched per turn
# max_sources = 6

[completion]
# Chat-completions endpoint and model
# endpoint = "https://oi-server.onrender.com/chat/completions"
# model = "openrouter/anthropic/claude-sonnet-4"

# Bearer token (it's recommended to use the QUEST_API_KEY environment
# variable instead)
# api_key = "sk-..."
# customer_id = "you@example.com"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_overrides() {
        let config = Config::default();
        assert!(config.server.port.is_none());
        assert!(config.completion.endpoint.is_none());
        assert_eq!(config.max_sources(), 6);
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert!(config.completion.model.is_none());
    }

    #[test]
    fn test_partial_config_parses() {
        let config: Config = toml::from_str(
            r#"
            [search]
            max_sources = 3

            [completion]
            model = "some/model"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_sources(), 3);
        assert_eq!(config.completion.model.as_deref(), Some("some/model"));
        assert!(config.server.addr.is_none());
    }
}
