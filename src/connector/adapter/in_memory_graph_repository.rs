use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::GraphRepository;
use crate::domain::{
    validate_label, validate_property_key, Connection, DomainError, Properties, SOURCE_LABEL,
};

/// Process-local graph: nodes per label plus a list of connections.
/// Raw Cypher is not interpreted.
pub struct InMemoryGraphRepository {
    nodes: Arc<Mutex<HashMap<String, Vec<Properties>>>>,
    connections: Arc<Mutex<Vec<Connection>>>,
}

impl InMemoryGraphRepository {
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(Mutex::new(HashMap::new())),
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn node_count(&self, label: &str) -> usize {
        self.nodes.lock().await.get(label).map_or(0, Vec::len)
    }
}

impl Default for InMemoryGraphRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn has_value(node: &Properties, key: &str, value: &str) -> bool {
    node.get(key).and_then(|v| v.as_str()) == Some(value)
}

#[async_trait]
impl GraphRepository for InMemoryGraphRepository {
    async fn verify_connectivity(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn create_node(&self, label: &str, properties: Properties) -> Result<Properties, DomainError> {
        let label = validate_label(label)?;
        let mut nodes = self.nodes.lock().await;
        nodes
            .entry(label.to_string())
            .or_default()
            .push(properties.clone());
        debug!("Created {} node in memory", label);
        Ok(properties)
    }

    async fn find_node(
        &self,
        label: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<Properties>, DomainError> {
        let label = validate_label(label)?;
        let key = validate_property_key(key)?;
        let nodes = self.nodes.lock().await;
        Ok(nodes
            .get(label)
            .and_then(|list| list.iter().find(|n| has_value(n, key, value)))
            .cloned())
    }

    async fn update_node(
        &self,
        label: &str,
        key: &str,
        value: &str,
        properties: Properties,
    ) -> Result<Option<Properties>, DomainError> {
        let label = validate_label(label)?;
        let key = validate_property_key(key)?;
        let mut nodes = self.nodes.lock().await;
        let node = nodes
            .get_mut(label)
            .and_then(|list| list.iter_mut().find(|n| has_value(n, key, value)));

        Ok(node.map(|node| {
            for (k, v) in properties {
                node.insert(k, v);
            }
            node.clone()
        }))
    }

    async fn delete_node(&self, label: &str, key: &str, value: &str) -> Result<bool, DomainError> {
        let label = validate_label(label)?;
        let key = validate_property_key(key)?;
        let mut nodes = self.nodes.lock().await;
        let Some(list) = nodes.get_mut(label) else {
            return Ok(false);
        };

        let before = list.len();
        list.retain(|n| !has_value(n, key, value));
        let deleted = list.len() < before;

        if deleted && label == SOURCE_LABEL && key == "sourceId" {
            self.connections
                .lock()
                .await
                .retain(|c| !c.involves(value));
        }
        Ok(deleted)
    }

    async fn create_relationship(
        &self,
        connection: &Connection,
    ) -> Result<Option<Connection>, DomainError> {
        let nodes = self.nodes.lock().await;
        let exists = |id: &str| {
            nodes
                .get(SOURCE_LABEL)
                .is_some_and(|list| list.iter().any(|n| has_value(n, "sourceId", id)))
        };
        if !exists(&connection.from_source_id) || !exists(&connection.to_source_id) {
            return Ok(None);
        }

        self.connections.lock().await.push(connection.clone());
        Ok(Some(connection.clone()))
    }

    async fn delete_relationship(&self, connection_id: &str) -> Result<bool, DomainError> {
        let mut connections = self.connections.lock().await;
        let before = connections.len();
        connections.retain(|c| c.connection_id != connection_id);
        Ok(connections.len() < before)
    }

    async fn relationships_of(&self, source_id: &str) -> Result<Vec<Connection>, DomainError> {
        let connections = self.connections.lock().await;
        let mut found: Vec<Connection> = connections
            .iter()
            .filter(|c| c.involves(source_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(found)
    }

    async fn execute_query(
        &self,
        _cypher: &str,
        _parameters: Properties,
    ) -> Result<Vec<Properties>, DomainError> {
        Err(DomainError::invalid_input(
            "raw Cypher is not supported by the in-memory graph store",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source_props(id: &str) -> Properties {
        json!({"sourceId": id, "name": id}).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_node_crud() {
        let graph = InMemoryGraphRepository::new();
        graph.create_node("source", source_props("s1")).await.unwrap();

        let found = graph.find_node("source", "sourceId", "s1").await.unwrap();
        assert_eq!(found.unwrap()["name"], "s1");

        let mut update = Properties::new();
        update.insert("name".to_string(), json!("renamed"));
        let updated = graph
            .update_node("source", "sourceId", "s1", update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["name"], "renamed");

        assert!(graph.delete_node("source", "sourceId", "s1").await.unwrap());
        assert!(!graph.delete_node("source", "sourceId", "s1").await.unwrap());
        assert_eq!(graph.node_count("source").await, 0);
    }

    #[tokio::test]
    async fn test_unsupported_label_rejected() {
        let graph = InMemoryGraphRepository::new();
        let err = graph.create_node("web", Properties::new()).await.unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_deleting_source_drops_its_connections() {
        let graph = InMemoryGraphRepository::new();
        graph.create_node("source", source_props("a")).await.unwrap();
        graph.create_node("source", source_props("b")).await.unwrap();

        let conn = Connection::new("u", "w", "a", "b").unwrap();
        assert!(graph.create_relationship(&conn).await.unwrap().is_some());
        assert_eq!(graph.relationships_of("b").await.unwrap().len(), 1);

        graph.delete_node("source", "sourceId", "a").await.unwrap();
        assert!(graph.relationships_of("b").await.unwrap().is_empty());
    }
}
