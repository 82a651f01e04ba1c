//! HTTP route handlers for the mapping API

use crate::http_server::AppState;
use crate::mapping::prompts::{build_mapping_prompt, build_transform_prompt};
use crate::mapping::{MappingError, MappingResult, SuggestResponse, TransformResponse};
use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use serde_json::{json, Map, Value};

/// Field lookup over a request body that may not be a JSON object.
///
/// A key counts as present when it exists and is not `null`.
struct RequestBody(Map<String, Value>);

impl RequestBody {
    fn new(body: Value) -> Self {
        match body {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        }
    }

    fn take(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key).filter(|value| !value.is_null())
    }

    fn take_string(&mut self, key: &str) -> MappingResult<Option<String>> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(MappingError::validation(format!("{} must be a string", key))),
        }
    }
}

/// Suggest field mappings between two schemas and record them as a template
pub async fn suggest_mappings(
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> MappingResult<HttpResponse> {
    info!("Received mapping suggestion request");

    let mut body = RequestBody::new(body.into_inner());
    let formats = (body.take("sourceFormat"), body.take("targetFormat"));
    let (source_format, target_format) = match formats {
        (Some(source), Some(target)) => (source, target),
        _ => {
            warn!("Rejected suggestion request without both formats");
            return Err(MappingError::validation(
                "sourceFormat and targetFormat are required",
            ));
        }
    };
    let name = body.take_string("name")?;

    let prompt = build_mapping_prompt(&source_format, &target_format);
    let ai_result = state.gateway.call_model_json(&prompt).await.map_err(|e| {
        error!("Mapping suggestion failed: {}", e);
        MappingError::from(e)
    })?;

    let mappings = extract_mappings(ai_result);
    let template = state
        .store
        .save_template(name, source_format, target_format, mappings.clone())
        .await;

    info!("Stored mapping template '{}' ({})", template.name, template.id);
    Ok(HttpResponse::Ok().json(SuggestResponse {
        template_id: template.id,
        mappings,
    }))
}

/// The model is asked for `{"mappings": [...]}`; anything else is kept whole.
fn extract_mappings(ai_result: Value) -> Value {
    match ai_result {
        Value::Object(mut obj) if obj.contains_key("mappings") => {
            obj.remove("mappings").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Transform a payload into a target format, either from a stored template or
/// from formats given inline
pub async fn transform_data(
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> MappingResult<HttpResponse> {
    info!("Received transform request");

    let mut body = RequestBody::new(body.into_inner());
    let source_data = body
        .take("sourceData")
        .ok_or_else(|| MappingError::validation("sourceData is required"))?;

    let template_id = body.take_string("template_id")?.filter(|id| !id.is_empty());
    let (source_format, target_format) = match template_id {
        Some(template_id) => {
            let template = state
                .store
                .find_template(&template_id)
                .await
                .ok_or_else(|| {
                    warn!("Transform requested unknown template {}", template_id);
                    MappingError::not_found("template_id not found")
                })?;
            (template.source_format, template.target_format)
        }
        None => match (body.take("sourceFormat"), body.take("targetFormat")) {
            (Some(source), Some(target)) => (source, target),
            _ => {
                return Err(MappingError::validation(
                    "Either provide template_id or both sourceFormat and targetFormat",
                ))
            }
        },
    };
    let extra = body.take_string("extraInstructions")?.unwrap_or_default();

    let prompt = build_transform_prompt(&source_format, &target_format, &source_data, &extra);
    let transformed = state.gateway.call_model_json(&prompt).await.map_err(|e| {
        error!("Transform failed: {}", e);
        MappingError::from(e)
    })?;

    info!("Transform completed");
    Ok(HttpResponse::Ok().json(TransformResponse { transformed }))
}

/// List all templates in creation order
pub async fn list_templates(state: web::Data<AppState>) -> HttpResponse {
    let templates = state.store.list_templates().await;
    info!("Returning {} mapping templates", templates.len());
    HttpResponse::Ok().json(templates)
}

/// Get mapping service status
pub async fn get_status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "running",
        "model": state.gateway.model(),
        "template_count": state.store.count().await,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Register the mapping routes under `/mapping`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/mapping")
            .route("/suggest", web::post().to(suggest_mappings))
            .route("/transform", web::post().to(transform_data))
            .route("/templates", web::get().to(list_templates))
            .route("/status", web::get().to(get_status)),
    );
}
