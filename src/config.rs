//! Configuration management for Temporal Selves
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! All external service settings (Data Foundry, OpenAI) live in one
//! explicitly constructed [`Config`] that is validated once at startup,
//! rather than in ambient environment reads scattered through handlers.

use crate::error::{Result, TemporalError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Temporal Selves
///
/// This structure holds everything the service needs: HTTP listener
/// settings, Data Foundry credentials, completion backend settings, and
/// chat behavior knobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Data Foundry dataset configuration
    #[serde(default)]
    pub datafoundry: DataFoundryConfig,

    /// Completion backend configuration
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Chat behavior configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Data Foundry dataset configuration
///
/// The dataset id and API token have no usable defaults; `validate()`
/// rejects a config that leaves them empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFoundryConfig {
    /// Base URL of the Data Foundry instance
    #[serde(default = "default_df_base_url")]
    pub base_url: String,

    /// Dataset identifier the session documents live in
    #[serde(default)]
    pub dataset_id: String,

    /// API token for the dataset
    #[serde(default)]
    pub api_token: String,

    /// Default value for the `token` request header
    #[serde(default = "default_df_token")]
    pub default_token: String,
}

fn default_df_base_url() -> String {
    "https://datafoundry.id.tue.nl".to_string()
}

fn default_df_token() -> String {
    "internal".to_string()
}

impl Default for DataFoundryConfig {
    fn default() -> Self {
        Self {
            base_url: default_df_base_url(),
            dataset_id: String::new(),
            api_token: String::new(),
            default_token: default_df_token(),
        }
    }
}

impl DataFoundryConfig {
    /// True when both the dataset id and the API token are set
    pub fn has_credentials(&self) -> bool {
        !self.dataset_id.is_empty() && !self.api_token.is_empty()
    }
}

/// Completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key for the completion API
    #[serde(default)]
    pub api_key: String,

    /// Model to request completions from
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Optional API base URL override (useful for tests and local mocks)
    ///
    /// When set, this base is used to build the completion endpoint, which
    /// allows tests to point the backend at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
            api_base: None,
        }
    }
}

/// Chat behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum number of prior messages sent with each completion request
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_history_window() -> usize {
    12
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
        }
    }
}

impl Config {
    /// Load configuration from a file with environment and CLI overrides
    ///
    /// Falls back to defaults when the file does not exist. Environment
    /// variables override file values, and CLI arguments override both.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed CLI arguments providing overrides
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TemporalError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Recognized variables match the original deployment contract:
    /// `DF_BASE_URL`, `DF_DATASET_ID`, `DF_API_TOKEN`, `OPENAI_API_KEY`,
    /// `OPENAI_MODEL`.
    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("DF_BASE_URL") {
            self.datafoundry.base_url = base_url;
        }

        if let Ok(dataset_id) = std::env::var("DF_DATASET_ID") {
            self.datafoundry.dataset_id = dataset_id;
        }

        if let Ok(api_token) = std::env::var("DF_API_TOKEN") {
            self.datafoundry.api_token = api_token;
        }

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = api_key;
        }

        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.openai.model = model;
        }
    }

    /// Apply CLI argument overrides
    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }

        if let Some(port) = cli.port {
            self.server.port = port;
        }
    }

    /// Validate the configuration, failing fast on anything unusable
    ///
    /// This is the single validation point for required external-service
    /// settings: serving without Data Foundry credentials or an OpenAI API
    /// key is a configuration error, not a runtime surprise.
    ///
    /// # Errors
    ///
    /// Returns an error when a required field is empty or a value is out of
    /// range.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(TemporalError::Config("server.host cannot be empty".to_string()).into());
        }

        if self.datafoundry.base_url.is_empty() {
            return Err(
                TemporalError::Config("datafoundry.base_url cannot be empty".to_string()).into(),
            );
        }

        if self.datafoundry.dataset_id.is_empty() {
            return Err(TemporalError::Config(
                "datafoundry.dataset_id is required (set DF_DATASET_ID)".to_string(),
            )
            .into());
        }

        if self.datafoundry.api_token.is_empty() {
            return Err(TemporalError::Config(
                "datafoundry.api_token is required (set DF_API_TOKEN)".to_string(),
            )
            .into());
        }

        if self.openai.api_key.is_empty() {
            return Err(TemporalError::Config(
                "openai.api_key is required (set OPENAI_API_KEY)".to_string(),
            )
            .into());
        }

        if self.chat.history_window == 0 {
            return Err(TemporalError::Config(
                "chat.history_window must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
