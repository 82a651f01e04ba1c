//! Chat-completions gateway that returns the model reply as parsed JSON

use crate::mapping::{GatewayError, MappingConfig, MappingResult};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// System instruction sent with every request
pub const SYSTEM_PROMPT: &str = "Return valid JSON only.";

/// Sampling temperature sent with every request
pub const TEMPERATURE: f32 = 0.2;

/// Something that can answer a prompt with a JSON value.
///
/// Handlers only depend on this trait so tests can substitute a stub.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send `prompt` to the model once and parse its reply as JSON
    async fn call_model_json(&self, prompt: &str) -> Result<Value, GatewayError>;

    /// Model identifier reported by the status route
    fn model(&self) -> &str;
}

/// Gateway backed by an OpenAI-compatible chat-completions API
pub struct OpenAiService {
    client: Client,
    config: MappingConfig,
}

/// Request to the chat-completions API
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

/// Message in a chat request
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat-completions API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Usage information from the API
#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

impl OpenAiService {
    /// Create a new gateway. Fails when the config has no API key.
    pub fn new(config: MappingConfig) -> MappingResult<Self> {
        config.validate()?;

        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: TEMPERATURE,
        }
    }

    /// Make a single API request and return the first choice's text
    async fn request_completion(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::ApiError { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "Model usage - prompt tokens: {:?}, completion tokens: {:?}, total tokens: {:?}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::empty_response("No choices in API response"))?
            .message
            .content
            .ok_or_else(|| GatewayError::empty_response("First choice has no content"))
    }
}

#[async_trait]
impl ModelGateway for OpenAiService {
    async fn call_model_json(&self, prompt: &str) -> Result<Value, GatewayError> {
        info!(
            "Sending prompt ({} chars) to model {}",
            prompt.len(),
            self.config.model
        );

        let request = self.build_request(prompt);
        let content = self.request_completion(&request).await.map_err(|e| {
            warn!("Model request failed: {}", e);
            e
        })?;

        debug!("Model reply ({} chars)", content.len());
        Ok(serde_json::from_str(&content)?)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn create_test_service(base_url: &str) -> OpenAiService {
        let config = MappingConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            ..Default::default()
        };
        OpenAiService::new(config).unwrap()
    }

    fn completion_body(content: &str) -> String {
        json!({
            "choices": [{
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })
        .to_string()
    }

    #[test]
    fn test_service_creation_fails_without_api_key() {
        let result = OpenAiService::new(MappingConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_request_shape() {
        let service = create_test_service("http://localhost");
        let request = serde_json::to_value(service.build_request("map these")).unwrap();

        assert_eq!(request["model"], "gpt-4.1-mini");
        assert_eq!(request["response_format"], json!({"type": "json_object"}));
        assert!((request["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(
            request["messages"],
            json!([
                {"role": "system", "content": "Return valid JSON only."},
                {"role": "user", "content": "map these"}
            ])
        );
    }

    #[tokio::test]
    async fn test_call_model_json_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4.1-mini",
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(r#"{"mappings": []}"#))
            .expect(1)
            .create_async()
            .await;

        let service = create_test_service(&server.url());
        let result = service.call_model_json("prompt").await.unwrap();

        assert_eq!(result, json!({"mappings": []}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_call_model_json_rejects_non_json_reply() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Sure! Here are your mappings."))
            .create_async()
            .await;

        let service = create_test_service(&server.url());
        let result = service.call_model_json("prompt").await;

        assert!(matches!(result, Err(GatewayError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_call_model_json_surfaces_api_error_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("Incorrect API key provided")
            .expect(1)
            .create_async()
            .await;

        let service = create_test_service(&server.url());
        let err = service.call_model_json("prompt").await.unwrap_err();

        match err {
            GatewayError::ApiError { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_call_model_json_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let service = create_test_service(&server.url());
        let result = service.call_model_json("prompt").await;

        assert!(matches!(result, Err(GatewayError::EmptyResponse(_))));
    }

    #[tokio::test]
    async fn test_call_model_json_unreachable_host() {
        // Nothing listens on port 9 locally.
        let service = create_test_service("http://127.0.0.1:9");
        let result = service.call_model_json("prompt").await;

        assert!(matches!(result, Err(GatewayError::HttpError(_))));
    }
}
