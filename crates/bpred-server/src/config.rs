//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, model artifact path and
//! the request policy (allowlist and input length limit).

use bpred_gatekeeper::{PolicyConfig, DEFAULT_ALLOWED_ELEMENTS, DEFAULT_MAX_INPUT_LENGTH};
use bpred_model::DEFAULT_ARTIFACT_PATH;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (default: 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Path to the pretrained pipeline artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Element symbols a molecule may contain (default: H, C, O, N)
    #[serde(default = "default_allowed_elements")]
    pub allowed_elements: Vec<String>,

    /// Longest accepted structure string in bytes
    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,
}

fn default_bind_port() -> u16 {
    5000
}

fn default_model_path() -> String {
    DEFAULT_ARTIFACT_PATH.to_string()
}

fn default_allowed_elements() -> Vec<String> {
    DEFAULT_ALLOWED_ELEMENTS.iter().map(|s| s.to_string()).collect()
}

fn default_max_input_length() -> usize {
    DEFAULT_MAX_INPUT_LENGTH
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;

        if config.bind_address.is_empty() {
            return Err(ConfigError::MissingField("bind_address".to_string()));
        }
        if config.model_path.is_empty() {
            return Err(ConfigError::MissingField("model_path".to_string()));
        }
        config
            .policy()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: default_bind_port(),
            model_path: default_model_path(),
            allowed_elements: default_allowed_elements(),
            max_input_length: default_max_input_length(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Request policy for the prediction service
    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            allowed_elements: self.allowed_elements.clone(),
            max_input_length: self.max_input_length,
        }
    }
}
