//! # Schema Mapper
//!
//! A small HTTP service that asks a chat-completions model to propose field
//! mappings between two example schemas and to transform concrete payloads from
//! one schema to another.
//!
//! ## Modules
//!
//! * `mapping` - Prompt construction, the model gateway, the template store and
//!   the HTTP handlers for the `/mapping` API
//! * `http_server` - Shared application state and the actix-web server
//! * `logging` - Logger initialization for the binaries

pub mod http_server;
pub mod logging;
pub mod mapping;

pub use http_server::{AppState, MappingHttpServer};
pub use mapping::{MappingConfig, MappingError, MappingResult};
