//! Schema registries and document validation

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;

use crate::domain::ResourceDocument;

use super::types::{RenderError, RenderResult, SchemaRegistryError, Violation};

/// Source of compiled validation schemas
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Arc<Validator>, SchemaRegistryError>;
}

/// Resolves `$ref` targets against schemas already known to a registry.
///
/// A reference such as `http://redfish.dmtf.org/schemas/v1/Resource.json#/definitions/Id`
/// is looked up by its last path segment (`Resource.json`), then by that
/// segment without the `.json` extension.
struct LocalSchemaRetriever {
    documents: Arc<HashMap<String, Value>>,
}

impl LocalSchemaRetriever {
    fn resolve(&self, uri: &str) -> Option<&Value> {
        let without_fragment = uri.split('#').next().unwrap_or(uri);
        let segment = without_fragment.rsplit('/').next().unwrap_or(without_fragment);

        self.documents.get(segment).or_else(|| {
            segment
                .strip_suffix(".json")
                .and_then(|stem| self.documents.get(stem))
        })
    }
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        self.resolve(uri.as_str())
            .cloned()
            .ok_or_else(|| format!("referenced schema {} is not loaded", uri.as_str()).into())
    }
}

/// Compile `schema`, resolving references from `documents`
fn compile_schema(
    name: &str,
    schema: &Value,
    documents: Arc<HashMap<String, Value>>,
) -> Result<Validator, SchemaRegistryError> {
    jsonschema::options()
        .with_retriever(LocalSchemaRetriever { documents })
        .build(schema)
        .map_err(|e| SchemaRegistryError::Invalid {
            name: name.to_string(),
            message: e.to_string(),
        })
}

/// In-memory schema registry; schemas are compiled on insert
pub struct InMemorySchemaRegistry {
    documents: DashMap<String, Value>,
    validators: DashMap<String, Arc<Validator>>,
}

impl Default for InMemorySchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySchemaRegistry {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            validators: DashMap::new(),
        }
    }

    /// Compile and add a schema, returning the validator it replaced.
    ///
    /// References may point at schemas inserted earlier, by name.
    pub fn insert(
        &self,
        name: impl Into<String>,
        schema: Value,
    ) -> Result<Option<Arc<Validator>>, SchemaRegistryError> {
        let name = name.into();

        let mut documents: HashMap<String, Value> = self
            .documents
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        documents.insert(name.clone(), schema.clone());

        let validator = compile_schema(&name, &schema, Arc::new(documents))?;

        self.documents.insert(name.clone(), schema);
        Ok(self.validators.insert(name, Arc::new(validator)))
    }

    pub fn remove(&self, name: &str) -> bool {
        self.documents.remove(name);
        self.validators.remove(name).is_some()
    }

    pub fn count(&self) -> usize {
        self.validators.len()
    }
}

#[async_trait]
impl SchemaRegistry for InMemorySchemaRegistry {
    async fn fetch(&self, name: &str) -> Result<Arc<Validator>, SchemaRegistryError> {
        self.validators
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SchemaRegistryError::NotFound(name.to_string()))
    }
}

/// Schemas loaded and compiled once from a directory of `*.json` files.
///
/// Each schema is reachable by its file name (`Chassis.v1_0_0.json`) and by
/// its stem (`Chassis.v1_0_0`). Two files claiming the same key fail the
/// load. The set is fixed after [`FileSchemaRegistry::load`].
#[derive(Debug, Default)]
pub struct FileSchemaRegistry {
    validators: HashMap<String, Arc<Validator>>,
    files: Vec<String>,
}

impl FileSchemaRegistry {
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self, SchemaRegistryError> {
        let dir = dir.as_ref();
        let dir_name = dir.display().to_string();
        let mut documents: HashMap<String, Value> = HashMap::new();
        let mut files: Vec<(String, String, Value)> = Vec::new();

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|source| SchemaRegistryError::Io {
                name: dir_name.clone(),
                source,
            })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| SchemaRegistryError::Io {
                name: dir_name.clone(),
                source,
            })?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let (Some(file_name), Some(stem)) = (
                path.file_name().and_then(|n| n.to_str()),
                path.file_stem().and_then(|n| n.to_str()),
            ) else {
                continue;
            };

            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| SchemaRegistryError::Io {
                    name: file_name.to_string(),
                    source,
                })?;
            let schema: Value =
                serde_json::from_str(&raw).map_err(|source| SchemaRegistryError::Parse {
                    name: file_name.to_string(),
                    source,
                })?;

            for key in [stem, file_name] {
                if documents.contains_key(key) {
                    return Err(SchemaRegistryError::Duplicate(key.to_string()));
                }
            }
            documents.insert(stem.to_string(), schema.clone());
            documents.insert(file_name.to_string(), schema.clone());
            files.push((file_name.to_string(), stem.to_string(), schema));
        }

        // Compilation is CPU-bound; keep it off the async workers
        let documents = Arc::new(documents);
        let registry = tokio::task::spawn_blocking(move || compile_all(files, documents))
            .await
            .map_err(|e| SchemaRegistryError::Invalid {
                name: dir_name.clone(),
                message: e.to_string(),
            })??;

        tracing::info!(
            directory = %dir_name,
            schemas = registry.count(),
            "Schema registry loaded"
        );

        Ok(registry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Number of distinct schema files loaded
    pub fn count(&self) -> usize {
        self.files.len()
    }
}

fn compile_all(
    files: Vec<(String, String, Value)>,
    documents: Arc<HashMap<String, Value>>,
) -> Result<FileSchemaRegistry, SchemaRegistryError> {
    let mut registry = FileSchemaRegistry::default();

    for (file_name, stem, schema) in files {
        let validator = Arc::new(compile_schema(&file_name, &schema, documents.clone())?);

        registry.validators.insert(stem, validator.clone());
        registry.validators.insert(file_name.clone(), validator);
        registry.files.push(file_name);
    }

    Ok(registry)
}

#[async_trait]
impl SchemaRegistry for FileSchemaRegistry {
    async fn fetch(&self, name: &str) -> Result<Arc<Validator>, SchemaRegistryError> {
        self.validators
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaRegistryError::NotFound(name.to_string()))
    }
}

/// Validate a rendered document against a compiled schema.
///
/// All schema violations are collected, followed by any broken
/// `<X>@odata.count` pairing in the document.
pub fn validate_document(
    schema_name: &str,
    validator: &Validator,
    document: &ResourceDocument,
) -> RenderResult<()> {
    let instance = document.to_value();
    let mut violations: Vec<Violation> = validator
        .iter_errors(&instance)
        .map(|error| Violation {
            instance_path: error.instance_path.to_string(),
            schema_path: error.schema_path.to_string(),
            message: error.to_string(),
        })
        .collect();

    violations.extend(
        document
            .check_collection_counts()
            .into_iter()
            .map(|mismatch| Violation {
                instance_path: format!("/{}", mismatch.count_key),
                schema_path: format!("/{}", mismatch.field),
                message: mismatch.to_string(),
            }),
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(RenderError::Validation {
            schema: schema_name.to_string(),
            violations,
        })
    }
}
