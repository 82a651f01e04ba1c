//! Append-only storage for generated mapping templates

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A mapping suggested by the model together with the schemas it was made for.
///
/// Templates are immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingTemplate {
    /// Generated UUID v4
    pub id: String,
    /// Caller supplied name, or `mapping-<first 8 chars of id>`
    pub name: String,
    #[serde(rename = "sourceFormat")]
    pub source_format: Value,
    #[serde(rename = "targetFormat")]
    pub target_format: Value,
    /// Model output, typically a list of source/target path pairs
    pub mappings: Value,
    /// UTC creation time, RFC 3339 with a `Z` suffix
    pub created_at: String,
}

impl MappingTemplate {
    /// Create a template with a fresh id and the current UTC time
    pub fn new(
        name: Option<String>,
        source_format: Value,
        target_format: Value,
        mappings: Value,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => Self::default_name(&id),
        };

        Self {
            id,
            name,
            source_format,
            target_format,
            mappings,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    fn default_name(id: &str) -> String {
        let prefix: String = id.chars().take(8).collect();
        format!("mapping-{}", prefix)
    }
}

/// Storage for mapping templates.
///
/// Implementations must keep insertion order and never modify a stored template.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Record a new template and return the stored copy
    async fn save_template(
        &self,
        name: Option<String>,
        source_format: Value,
        target_format: Value,
        mappings: Value,
    ) -> MappingTemplate;

    /// Look up a template by id
    async fn find_template(&self, id: &str) -> Option<MappingTemplate>;

    /// All templates in insertion order
    async fn list_templates(&self) -> Vec<MappingTemplate>;

    /// Number of stored templates
    async fn count(&self) -> usize;
}

/// Process-local template store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<Vec<MappingTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn save_template(
        &self,
        name: Option<String>,
        source_format: Value,
        target_format: Value,
        mappings: Value,
    ) -> MappingTemplate {
        let template = MappingTemplate::new(name, source_format, target_format, mappings);
        self.templates.write().await.push(template.clone());
        template
    }

    async fn find_template(&self, id: &str) -> Option<MappingTemplate> {
        self.templates
            .read()
            .await
            .iter()
            .find(|template| template.id == id)
            .cloned()
    }

    async fn list_templates(&self) -> Vec<MappingTemplate> {
        self.templates.read().await.clone()
    }

    async fn count(&self) -> usize {
        self.templates.read().await.len()
    }
}
