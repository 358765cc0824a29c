//! Template-to-resource render pipeline

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::domain::ResourceDocument;
use crate::metrics::RenderMetrics;

use super::schema::{validate_document, SchemaRegistry};
use super::types::{RenderError, RenderResult, SchemaRegistryError};
use super::view::ViewStore;

/// Turns a template name and a context into a resource document
#[derive(Clone)]
pub struct RenderEngine {
    views: Arc<dyn ViewStore>,
    schemas: Arc<dyn SchemaRegistry>,
}

impl RenderEngine {
    pub fn new(views: Arc<dyn ViewStore>, schemas: Arc<dyn SchemaRegistry>) -> Self {
        Self { views, schemas }
    }

    /// Fetch and parse a template without schema validation
    #[tracing::instrument(skip(self, context))]
    pub async fn get(&self, template: &str, context: &Value) -> RenderResult<ResourceDocument> {
        let started = Instant::now();
        let result = self.load(template, context).await;
        RenderMetrics::record_render(
            result.as_ref().map(|_| ()),
            started.elapsed().as_secs_f64(),
        );
        result
    }

    /// Fetch and parse a template, validating against `schema` when given.
    ///
    /// With `schema` set to `None` this is the same as [`RenderEngine::get`].
    #[tracing::instrument(skip(self, context))]
    pub async fn render(
        &self,
        template: &str,
        schema: Option<&str>,
        context: &Value,
    ) -> RenderResult<ResourceDocument> {
        let started = Instant::now();
        let result = self.load_and_validate(template, schema, context).await;
        RenderMetrics::record_render(
            result.as_ref().map(|_| ()),
            started.elapsed().as_secs_f64(),
        );
        result
    }

    async fn load_and_validate(
        &self,
        template: &str,
        schema: Option<&str>,
        context: &Value,
    ) -> RenderResult<ResourceDocument> {
        let document = self.load(template, context).await?;

        let Some(schema_name) = schema else {
            tracing::debug!(template = %template, "No schema requested, skipping validation");
            RenderMetrics::record_validation_skipped();
            return Ok(document);
        };

        let validator = self
            .schemas
            .fetch(schema_name)
            .await
            .map_err(|e| match e {
                SchemaRegistryError::NotFound(name) => RenderError::SchemaNotFound(name),
                source => RenderError::SchemaUnavailable {
                    name: schema_name.to_string(),
                    source,
                },
            })?;

        let validated = validate_document(schema_name, &validator, &document);
        RenderMetrics::record_validation(validated.is_ok());
        if let Err(RenderError::Validation { violations, .. }) = &validated {
            tracing::warn!(
                template = %template,
                schema = %schema_name,
                violations = violations.len(),
                "Rendered document failed schema validation"
            );
        }
        validated?;

        Ok(document)
    }

    async fn load(&self, template: &str, context: &Value) -> RenderResult<ResourceDocument> {
        let contents = self
            .views
            .fetch(template, context)
            .await
            .map_err(|source| RenderError::Template {
                name: template.to_string(),
                source,
            })?;

        serde_json::from_str(&contents).map_err(|source| RenderError::Parse {
            name: template.to_string(),
            source,
        })
    }
}
