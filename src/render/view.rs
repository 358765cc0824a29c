//! View stores supplying raw template contents

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::substitution::expand_placeholders;
use super::types::ViewError;

const VIEW_EXTENSION: &str = "json";

/// Source of raw template contents
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Fetch the contents of `name`, expanded against `context`
    async fn fetch(&self, name: &str, context: &Value) -> Result<String, ViewError>;
}

/// Check a view name is safe to resolve against a directory
pub fn validate_view_name(name: &str) -> Result<(), ViewError> {
    if name.is_empty() || name.len() > 255 {
        return Err(ViewError::InvalidName(
            "name must be 1-255 characters".to_string(),
        ));
    }

    if name.contains("..") {
        return Err(ViewError::InvalidName(format!(
            "{}: parent references are not allowed",
            name
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ViewError::InvalidName(format!(
            "{}: only alphanumeric, dash, underscore, or dot allowed",
            name
        )));
    }

    Ok(())
}

/// Views read from `<root>/<name>.json`
#[derive(Debug, Clone)]
pub struct FileViewStore {
    root: PathBuf,
}

impl FileViewStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ViewError> {
        validate_view_name(name)?;

        let suffix = format!(".{}", VIEW_EXTENSION);
        let file_name = if name.ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{}{}", name, suffix)
        };
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl ViewStore for FileViewStore {
    async fn fetch(&self, name: &str, context: &Value) -> Result<String, ViewError> {
        let path = self.path_for(name)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                tracing::trace!(view = %name, path = %path.display(), "View loaded");
                Ok(expand_placeholders(&contents, context))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ViewError::NotFound(name.to_string()))
            }
            Err(source) => Err(ViewError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

/// In-memory view storage
pub struct InMemoryViewStore {
    views: DashMap<String, String>,
}

impl Default for InMemoryViewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryViewStore {
    pub fn new() -> Self {
        Self {
            views: DashMap::new(),
        }
    }

    /// Add or replace a view, returning the previous contents
    pub fn insert(
        &self,
        name: impl Into<String>,
        contents: impl Into<String>,
    ) -> Result<Option<String>, ViewError> {
        let name = name.into();
        validate_view_name(&name)?;
        Ok(self.views.insert(name, contents.into()))
    }

    pub fn remove(&self, name: &str) -> Result<(), ViewError> {
        self.views
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ViewError::NotFound(name.to_string()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.views.len()
    }
}

#[async_trait]
impl ViewStore for InMemoryViewStore {
    async fn fetch(&self, name: &str, context: &Value) -> Result<String, ViewError> {
        // Shard guard must drop before expansion
        let contents = self
            .views
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ViewError::NotFound(name.to_string()))?;

        Ok(expand_placeholders(&contents, context))
    }
}
