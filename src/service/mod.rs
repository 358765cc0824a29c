//! Redfish API service facade.
//!
//! Bundles the render engine and the vendor classifier behind one cloneable
//! handle for route handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::classifier::{NodeDirectory, VendorClassification, VendorClassifier};
use crate::config::Settings;
use crate::domain::ResourceDocument;
use crate::error::Result;
use crate::render::{FileSchemaRegistry, FileViewStore, RenderEngine};

#[derive(Clone)]
pub struct RedfishApiService {
    engine: RenderEngine,
    classifier: VendorClassifier,
}

impl RedfishApiService {
    pub fn new(engine: RenderEngine, classifier: VendorClassifier) -> Self {
        Self { engine, classifier }
    }

    /// Build from settings: file-backed views and schemas, configured rules
    pub async fn from_settings(
        settings: &Settings,
        directory: Arc<dyn NodeDirectory>,
    ) -> Result<Self> {
        let views = Arc::new(FileViewStore::new(&settings.views.directory));
        let schemas = Arc::new(FileSchemaRegistry::load(&settings.schemas.directory).await?);
        let rules = Arc::new(settings.vendor_rules()?);
        let oui = Arc::new(settings.oui_table()?);

        tracing::info!(
            views = %settings.views.directory,
            schemas = schemas.count(),
            rules = rules.rules().len(),
            oui_entries = oui.len(),
            "Redfish API service initialized"
        );

        Ok(Self::new(
            RenderEngine::new(views, schemas),
            VendorClassifier::new(directory, rules, oui),
        ))
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    pub fn classifier(&self) -> &VendorClassifier {
        &self.classifier
    }

    pub async fn get(&self, template: &str, context: &Value) -> Result<ResourceDocument> {
        Ok(self.engine.get(template, context).await?)
    }

    pub async fn render(
        &self,
        template: &str,
        schema: Option<&str>,
        context: &Value,
    ) -> Result<ResourceDocument> {
        Ok(self.engine.render(template, schema, context).await?)
    }

    pub async fn get_vendor_name_by_id(&self, id: &str) -> Result<VendorClassification> {
        Ok(self.classifier.get_vendor_name_by_id(id).await?)
    }
}
