//! Configuration for the mapping module

use crate::mapping::{MappingError, MappingResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Default chat-completions model
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Default chat-completions API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the mapping module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// API key for the model provider
    pub api_key: String,
    /// Model identifier sent with every request
    pub model: String,
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl MappingConfig {
    /// Create a new mapping config from environment variables.
    ///
    /// Fails when `OPENAI_API_KEY` is absent or empty.
    pub fn from_env() -> MappingResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> MappingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY").unwrap_or_default();
        let model = lookup("OPENAI_MODEL")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = lookup("OPENAI_BASE_URL")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let config = Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> MappingResult<()> {
        if self.api_key.is_empty() {
            return Err(MappingError::configuration_error(
                "OPENAI_API_KEY is required",
            ));
        }

        if self.model.is_empty() {
            return Err(MappingError::configuration_error("Model is required"));
        }

        if self.base_url.is_empty() {
            return Err(MappingError::configuration_error("Base URL is required"));
        }

        Ok(())
    }

    /// API key suitable for logs
    pub fn api_key_masked(&self) -> String {
        if self.api_key.is_empty() {
            "<not configured>".to_string()
        } else {
            "***configured***".to_string()
        }
    }
}
