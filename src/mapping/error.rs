//! Error types for the mapping module

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures of a single model call
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport, TLS or body decoding failures
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    /// The API answered without any message content
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// The model reply was not valid JSON
    #[error("Model reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl GatewayError {
    /// Create a new empty response error
    pub fn empty_response(msg: impl Into<String>) -> Self {
        Self::EmptyResponse(msg.into())
    }
}

/// Errors that can occur while serving the mapping API
#[derive(Error, Debug)]
pub enum MappingError {
    /// Missing or mistyped request fields
    #[error("{0}")]
    Validation(String),

    /// Unknown template id
    #[error("{0}")]
    NotFound(String),

    /// Model call or reply parsing failed
    #[error("OpenAI error: {0}")]
    Gateway(#[from] GatewayError),

    /// Missing API key and similar startup problems
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MappingError {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl ResponseError for MappingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Gateway(_) | Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            MappingError::validation("missing").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MappingError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MappingError::from(GatewayError::empty_response("no choices")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_gateway_message_is_passed_through() {
        let err = MappingError::from(GatewayError::ApiError {
            status: 401,
            body: "invalid api key".to_string(),
        });
        let message = err.to_string();
        assert!(message.starts_with("OpenAI error: "));
        assert!(message.contains("401"));
        assert!(message.contains("invalid api key"));
    }

    #[test]
    fn test_invalid_json_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GatewayError = parse_err.into();
        assert!(matches!(err, GatewayError::InvalidJson(_)));
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = MappingError::validation("sourceData is required");
        assert_eq!(err.to_string(), "sourceData is required");
    }
}
