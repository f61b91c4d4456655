//! Gatekeeper configuration

use crate::GatekeeperError;
use bpred_chem::Element;
use serde::Deserialize;
use std::str::FromStr;

/// Elements present in the model's training data
pub const DEFAULT_ALLOWED_ELEMENTS: [&str; 4] = ["H", "C", "O", "N"];

/// Longest structure string accepted by the caller guard
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 500;

/// Configuration for the request policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Element symbols a molecule may contain
    pub allowed_elements: Vec<String>,

    /// Maximum submission length in bytes
    pub max_input_length: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_elements: DEFAULT_ALLOWED_ELEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
        }
    }
}

impl PolicyConfig {
    /// Default policy with a different allowlist
    pub fn with_elements<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_elements: elements.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Check that every symbol is a real element and the limits are usable
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.allowed_elements.is_empty() {
            return Err(GatekeeperError::Config(
                "allowed_elements must not be empty".to_string(),
            ));
        }
        for symbol in &self.allowed_elements {
            Element::from_str(symbol).map_err(|e| GatekeeperError::Config(e.to_string()))?;
        }
        if self.max_input_length == 0 {
            return Err(GatekeeperError::Config(
                "max_input_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
