use crate::mapping::routes as mapping_routes;
use crate::mapping::{
    InMemoryTemplateStore, MappingConfig, MappingError, MappingResult, ModelGateway,
    OpenAiService, TemplateStore,
};

use actix_cors::Cors;
use actix_web::{error, middleware::Logger, web, App, HttpServer as ActixHttpServer};
use log::{info, warn};
use std::sync::Arc;

/// Shared application state for the HTTP server.
pub struct AppState {
    /// Template storage shared by all workers
    pub store: Arc<dyn TemplateStore>,
    /// Model gateway shared by all workers
    pub gateway: Arc<dyn ModelGateway>,
}

impl AppState {
    /// Build state backed by the chat-completions API and an in-memory store
    pub fn from_config(config: MappingConfig) -> MappingResult<Self> {
        Ok(Self {
            store: Arc::new(InMemoryTemplateStore::new()),
            gateway: Arc::new(OpenAiService::new(config)?),
        })
    }
}

/// JSON extractor settings.
///
/// Bodies are parsed as JSON whatever their Content-Type says; malformed
/// bodies are reported as `{"error": ...}` with 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .content_type(|_| true)
        .error_handler(|err, _req| {
            warn!("Rejected malformed JSON body: {}", err);
            error::Error::from(MappingError::validation(format!(
                "Invalid JSON body: {}",
                err
            )))
        })
}

/// Register everything the service exposes. Shared by the server and tests.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).configure(mapping_routes::configure);
}

/// HTTP server for the mapping service.
///
/// Serves the `/mapping` API with permissive CORS so browser front ends on
/// other origins can call it.
pub struct MappingHttpServer {
    state: web::Data<AppState>,
    /// The HTTP server bind address
    bind_address: String,
}

impl MappingHttpServer {
    /// Create a new HTTP server.
    ///
    /// # Arguments
    ///
    /// * `state` - Store and gateway used by the handlers
    /// * `bind_address` - The address to bind to (e.g., "0.0.0.0:8001")
    pub fn new(state: AppState, bind_address: &str) -> Self {
        Self {
            state: web::Data::new(state),
            bind_address: bind_address.to_string(),
        }
    }

    /// Run the HTTP server until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an `std::io::Error` if the address cannot be bound or the
    /// server fails while running.
    pub async fn run(&self) -> std::io::Result<()> {
        info!("HTTP server running on {}", self.bind_address);

        let app_state = self.state.clone();
        let server = ActixHttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(Logger::default())
                .wrap(cors)
                .app_data(app_state.clone())
                .configure(configure_app)
        })
        .bind(&self.bind_address)?;

        server.run().await
    }
}
