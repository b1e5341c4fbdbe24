use async_trait::async_trait;

use crate::domain::{Connection, DomainError, Properties};

/// Node and relationship CRUD against the graph store.
///
/// Labels must pass [`crate::domain::validate_label`]; implementations
/// reject anything else with `InvalidInput`.
#[async_trait]
pub trait GraphRepository: Send + Sync {
    async fn verify_connectivity(&self) -> Result<(), DomainError>;

    /// Creates a node and returns its stored properties.
    async fn create_node(&self, label: &str, properties: Properties)
        -> Result<Properties, DomainError>;

    async fn find_node(
        &self,
        label: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<Properties>, DomainError>;

    /// Merges `properties` into the matching node.
    async fn update_node(
        &self,
        label: &str,
        key: &str,
        value: &str,
        properties: Properties,
    ) -> Result<Option<Properties>, DomainError>;

    /// Deletes the node and its relationships. Returns whether a node matched.
    async fn delete_node(&self, label: &str, key: &str, value: &str) -> Result<bool, DomainError>;

    /// Links two existing source nodes. Returns `None` if either is missing.
    async fn create_relationship(
        &self,
        connection: &Connection,
    ) -> Result<Option<Connection>, DomainError>;

    async fn delete_relationship(&self, connection_id: &str) -> Result<bool, DomainError>;

    /// Connections in either direction touching `source_id`.
    async fn relationships_of(&self, source_id: &str) -> Result<Vec<Connection>, DomainError>;

    /// Runs a raw statement and returns one JSON object per record.
    async fn execute_query(
        &self,
        cypher: &str,
        parameters: Properties,
    ) -> Result<Vec<Properties>, DomainError>;

    async fn close(&self) {}
}
