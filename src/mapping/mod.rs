//! # Mapping Module
//!
//! The mapping module turns two example data shapes into a field-by-field
//! mapping suggested by a language model, and uses those shapes to transform
//! concrete payloads.
//!
//! ## Components
//!
//! * `prompts` - Builds the natural-language prompts sent to the model
//! * `openai_service` - Chat-completions gateway that returns parsed JSON
//! * `template_store` - Append-only store of generated mapping templates
//! * `error` - Error types for mapping operations
//! * `config` - Environment-driven configuration
//! * `routes` - HTTP route handlers for the mapping API
//!
//! ## Flow
//!
//! 1. Accept a JSON body and check the keys the endpoint needs
//! 2. Build a prompt from the schemas (and data, for transforms)
//! 3. Send the prompt to the model and parse its JSON reply
//! 4. For suggestions, record the result as a new template

pub mod config;
pub mod error;
pub mod openai_service;
pub mod prompts;
pub mod routes;
pub mod template_store;

// Public re-exports
pub use config::MappingConfig;
pub use error::{GatewayError, MappingError};
pub use openai_service::{ModelGateway, OpenAiService};
pub use template_store::{InMemoryTemplateStore, MappingTemplate, TemplateStore};

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

/// Response body of a successful mapping suggestion
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SuggestResponse {
    /// Id of the template recorded for this suggestion
    pub template_id: String,
    /// Mappings proposed by the model
    pub mappings: serde_json::Value,
}

/// Response body of a successful transform
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TransformResponse {
    /// Payload rewritten into the target format
    pub transformed: serde_json::Value,
}
