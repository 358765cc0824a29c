//! Resource render pipeline.
//!
//! This module provides:
//! - View stores returning raw template contents with `{{path}}` placeholders expanded
//! - Schema registries supplying JSON schemas by name
//! - The render engine: fetch, parse, and optionally validate a resource
//!
//! # Example
//!
//! ```ignore
//! let views = Arc::new(FileViewStore::new("data/views"));
//! let schemas = Arc::new(FileSchemaRegistry::load("data/schemas").await?);
//! let engine = RenderEngine::new(views, schemas);
//!
//! // Without validation
//! let systems = engine.get("systems", &json!({})).await?;
//!
//! // With validation
//! let system = engine
//!     .render("system", Some("ComputerSystem.v1_1_0"), &json!({"identifier": id}))
//!     .await?;
//! ```

mod engine;
mod schema;
mod substitution;
mod types;
mod view;

pub use engine::RenderEngine;
pub use schema::{validate_document, FileSchemaRegistry, InMemorySchemaRegistry, SchemaRegistry};
pub use substitution::expand_placeholders;
pub use types::{RenderError, RenderResult, SchemaRegistryError, ViewError, Violation};
pub use view::{validate_view_name, FileViewStore, InMemoryViewStore, ViewStore};
