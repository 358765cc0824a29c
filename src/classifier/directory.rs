//! Node directory trait and in-memory implementation

use async_trait::async_trait;
use dashmap::DashMap;

use super::types::{DirectoryError, NodeRecord};

/// Lookup of node records by id or reported identifier
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    /// `Ok(None)` means no such node; `Err` is a failed lookup
    async fn get_node_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<NodeRecord>, DirectoryError>;
}

/// In-memory node directory keyed by node id
pub struct InMemoryNodeDirectory {
    nodes: DashMap<String, NodeRecord>,
}

impl Default for InMemoryNodeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNodeDirectory {
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
        }
    }

    /// Add or replace a node, returning the previous record
    pub fn insert(&self, node: NodeRecord) -> Option<NodeRecord> {
        self.nodes.insert(node.id.clone(), node)
    }

    pub fn remove(&self, id: &str) -> Option<NodeRecord> {
        self.nodes.remove(id).map(|(_, node)| node)
    }

    pub fn count(&self) -> usize {
        self.nodes.len()
    }
}

#[async_trait]
impl NodeDirectory for InMemoryNodeDirectory {
    async fn get_node_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<NodeRecord>, DirectoryError> {
        if let Some(node) = self.nodes.get(identifier) {
            return Ok(Some(node.value().clone()));
        }

        Ok(self
            .nodes
            .iter()
            .find(|entry| entry.identifiers().iter().any(|i| i == identifier))
            .map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_by_id_and_identifier() {
        let directory = InMemoryNodeDirectory::new();
        directory.insert(NodeRecord::new(
            "599337d6ff99ed24305bc58a",
            vec!["1.1.1.0:sys/rack-unit-2".to_string()],
        ));

        let by_id = directory
            .get_node_by_identifier("599337d6ff99ed24305bc58a")
            .await
            .unwrap();
        let by_identifier = directory
            .get_node_by_identifier("1.1.1.0:sys/rack-unit-2")
            .await
            .unwrap();

        assert!(by_id.is_some());
        assert_eq!(by_id, by_identifier);
    }

    #[tokio::test]
    async fn test_lookup_missing() {
        let directory = InMemoryNodeDirectory::new();
        assert!(directory
            .get_node_by_identifier("testid")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_insert_and_remove() {
        let directory = InMemoryNodeDirectory::new();
        assert!(directory.insert(NodeRecord::new("a", vec![])).is_none());
        assert!(directory.insert(NodeRecord::new("a", vec![])).is_some());
        assert_eq!(directory.count(), 1);

        assert!(directory.remove("a").is_some());
        assert_eq!(directory.count(), 0);
    }
}
