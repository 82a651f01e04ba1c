//! Common test utilities for the mapping route tests
//!
//! Provides a stub model gateway and a helper that builds the same app the
//! server runs, minus CORS and access logging.

#![allow(dead_code)]

use actix_web::{web, App};
use async_trait::async_trait;
use schema_mapper::http_server::configure_app;
use schema_mapper::mapping::{GatewayError, InMemoryTemplateStore, ModelGateway, TemplateStore};
use schema_mapper::AppState;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Canned outcome for the stub gateway
pub enum StubReply {
    Json(Value),
    Fail(String),
}

/// Model gateway that records prompts and answers with a fixed reply
pub struct StubGateway {
    reply: StubReply,
    prompts: Mutex<Vec<String>>,
}

impl StubGateway {
    pub fn returning(value: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: StubReply::Json(value),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: StubReply::Fail(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelGateway for StubGateway {
    async fn call_model_json(&self, prompt: &str) -> Result<Value, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            StubReply::Json(value) => Ok(value.clone()),
            StubReply::Fail(message) => Err(GatewayError::empty_response(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

/// Shared state wired to a fresh in-memory store and the given gateway
pub fn test_state(gateway: Arc<StubGateway>) -> (web::Data<AppState>, Arc<InMemoryTemplateStore>) {
    let store = Arc::new(InMemoryTemplateStore::new());
    let state = web::Data::new(AppState {
        store: store.clone() as Arc<dyn TemplateStore>,
        gateway,
    });
    (state, store)
}

/// Build an app instance for `actix_web::test::init_service`
pub fn test_app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(configure_app)
}
