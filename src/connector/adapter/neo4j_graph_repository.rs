use std::collections::HashMap;

use async_trait::async_trait;
use neo4rs::{
    query, BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph, Query, Row,
};
use tracing::debug;

use crate::application::GraphRepository;
use crate::domain::{
    validate_label, validate_property_key, Connection, DomainError, Properties, CONNECTION_TYPE,
    SOURCE_LABEL,
};

const MAX_CONNECTIONS: usize = 16;
const FETCH_SIZE: usize = 500;

/// Neo4j-backed graph store. Values always travel as parameters; only
/// validated labels and property keys are templated into statements.
pub struct Neo4jGraphRepository {
    graph: Graph,
    uri: String,
}

impl Neo4jGraphRepository {
    pub async fn connect(uri: &str, username: &str, password: &str) -> Result<Self, DomainError> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(username)
            .password(password)
            .max_connections(MAX_CONNECTIONS)
            .fetch_size(FETCH_SIZE)
            .build()
            .map_err(|e| DomainError::config(format!("Invalid Neo4j configuration: {}", e)))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| DomainError::graph(format!("Failed to connect to Neo4j: {}", e)))?;

        debug!("Connected to Neo4j at {}", uri);
        Ok(Self {
            graph,
            uri: uri.to_string(),
        })
    }

    async fn fetch_all(&self, q: Query) -> Result<Vec<Row>, DomainError> {
        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| DomainError::graph(format!("Query failed: {}", e)))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| DomainError::graph(format!("Failed to read result: {}", e)))?
        {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn fetch_properties(&self, q: Query, column: &str) -> Result<Option<Properties>, DomainError> {
        match self.fetch_all(q).await?.into_iter().next() {
            Some(row) => Ok(Some(row_properties(&row, column)?)),
            None => Ok(None),
        }
    }

    async fn fetch_count(&self, q: Query) -> Result<i64, DomainError> {
        match self.fetch_all(q).await?.into_iter().next() {
            Some(row) => row
                .get::<i64>("deleted")
                .map_err(|e| DomainError::graph(format!("Malformed count: {}", e))),
            None => Ok(0),
        }
    }
}

/// Converts a JSON value into a Bolt parameter.
pub fn to_bolt(value: &serde_json::Value) -> BoltType {
    match value {
        serde_json::Value::Null => BoltType::Null(BoltNull),
        serde_json::Value::Bool(b) => BoltType::from(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => BoltType::from(s.as_str()),
        serde_json::Value::Array(items) => BoltType::List(BoltList {
            value: items.iter().map(to_bolt).collect(),
        }),
        serde_json::Value::Object(map) => BoltType::Map(properties_to_bolt(map)),
    }
}

pub fn properties_to_bolt(properties: &Properties) -> BoltMap {
    let value: HashMap<BoltString, BoltType> = properties
        .iter()
        .map(|(k, v)| (BoltString::from(k.as_str()), to_bolt(v)))
        .collect();
    BoltMap { value }
}

fn row_properties(row: &Row, column: &str) -> Result<Properties, DomainError> {
    match row.get::<serde_json::Value>(column) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(DomainError::graph(format!(
            "Expected a property map in '{}', got {}",
            column, other
        ))),
        Err(e) => Err(DomainError::graph(format!(
            "Failed to decode '{}': {}",
            column, e
        ))),
    }
}

fn connection_from_row(row: &Row) -> Result<Connection, DomainError> {
    let mut props = row_properties(row, "rel")?;
    let from: String = row
        .get("fromId")
        .map_err(|e| DomainError::graph(format!("Missing fromId: {}", e)))?;
    let to: String = row
        .get("toId")
        .map_err(|e| DomainError::graph(format!("Missing toId: {}", e)))?;
    props.insert("fromSourceId".to_string(), from.into());
    props.insert("toSourceId".to_string(), to.into());

    serde_json::from_value(serde_json::Value::Object(props))
        .map_err(|e| DomainError::graph(format!("Malformed connection: {}", e)))
}

fn node_pattern(label: &str, key: &str) -> Result<String, DomainError> {
    let label = validate_label(label)?;
    let key = validate_property_key(key)?;
    Ok(format!("(n:{} {{{}: $value}})", label, key))
}

#[async_trait]
impl GraphRepository for Neo4jGraphRepository {
    async fn verify_connectivity(&self) -> Result<(), DomainError> {
        self.graph
            .run(query("RETURN 1"))
            .await
            .map_err(|e| DomainError::graph(format!("Neo4j at {} unreachable: {}", self.uri, e)))
    }

    async fn create_node(&self, label: &str, properties: Properties) -> Result<Properties, DomainError> {
        let label = validate_label(label)?;
        let q = query(&format!(
            "CREATE (n:{} $props) RETURN properties(n) AS node",
            label
        ))
        .param("props", BoltType::Map(properties_to_bolt(&properties)));

        self.fetch_properties(q, "node")
            .await?
            .ok_or_else(|| DomainError::graph(format!("CREATE returned no {} node", label)))
    }

    async fn find_node(
        &self,
        label: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<Properties>, DomainError> {
        let q = query(&format!(
            "MATCH {} RETURN properties(n) AS node LIMIT 1",
            node_pattern(label, key)?
        ))
        .param("value", value);
        self.fetch_properties(q, "node").await
    }

    async fn update_node(
        &self,
        label: &str,
        key: &str,
        value: &str,
        properties: Properties,
    ) -> Result<Option<Properties>, DomainError> {
        let q = query(&format!(
            "MATCH {} SET n += $props RETURN properties(n) AS node",
            node_pattern(label, key)?
        ))
        .param("value", value)
        .param("props", BoltType::Map(properties_to_bolt(&properties)));
        self.fetch_properties(q, "node").await
    }

    async fn delete_node(&self, label: &str, key: &str, value: &str) -> Result<bool, DomainError> {
        let q = query(&format!(
            "MATCH {} WITH n, n.{} AS matched DETACH DELETE n RETURN count(matched) AS deleted",
            node_pattern(label, key)?,
            key
        ))
        .param("value", value);
        Ok(self.fetch_count(q).await? > 0)
    }

    async fn create_relationship(
        &self,
        connection: &Connection,
    ) -> Result<Option<Connection>, DomainError> {
        let q = query(&format!(
            "MATCH (a:{label} {{sourceId: $from}}), (b:{label} {{sourceId: $to}}) \
             CREATE (a)-[r:{rel} $props]->(b) \
             RETURN properties(r) AS rel, a.sourceId AS fromId, b.sourceId AS toId",
            label = SOURCE_LABEL,
            rel = CONNECTION_TYPE
        ))
        .param("from", connection.from_source_id.as_str())
        .param("to", connection.to_source_id.as_str())
        .param(
            "props",
            BoltType::Map(properties_to_bolt(&connection.relationship_properties())),
        );

        match self.fetch_all(q).await?.into_iter().next() {
            Some(row) => Ok(Some(connection_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_relationship(&self, connection_id: &str) -> Result<bool, DomainError> {
        let q = query(&format!(
            "MATCH ()-[r:{} {{connectionId: $id}}]->() \
             WITH r, r.connectionId AS matched DELETE r RETURN count(matched) AS deleted",
            CONNECTION_TYPE
        ))
        .param("id", connection_id);
        Ok(self.fetch_count(q).await? > 0)
    }

    async fn relationships_of(&self, source_id: &str) -> Result<Vec<Connection>, DomainError> {
        let q = query(&format!(
            "MATCH (a:{label})-[r:{rel}]->(b:{label}) \
             WHERE a.sourceId = $id OR b.sourceId = $id \
             RETURN properties(r) AS rel, a.sourceId AS fromId, b.sourceId AS toId \
             ORDER BY r.created",
            label = SOURCE_LABEL,
            rel = CONNECTION_TYPE
        ))
        .param("id", source_id);

        self.fetch_all(q)
            .await?
            .iter()
            .map(connection_from_row)
            .collect()
    }

    async fn execute_query(
        &self,
        cypher: &str,
        parameters: Properties,
    ) -> Result<Vec<Properties>, DomainError> {
        let mut q = query(cypher);
        for (key, value) in &parameters {
            q = q.param(key, to_bolt(value));
        }

        self.fetch_all(q)
            .await?
            .iter()
            .map(|row| {
                row.to::<Properties>()
                    .map_err(|e| DomainError::graph(format!("Failed to decode record: {}", e)))
            })
            .collect()
    }

    async fn close(&self) {
        // neo4rs has no explicit shutdown; the pool goes when the Graph is dropped
        debug!("Neo4j pool for {} is released when the repository is dropped", self.uri);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_pattern_templates_validated_parts() {
        assert_eq!(
            node_pattern("source", "sourceId").unwrap(),
            "(n:source {sourceId: $value})"
        );
        assert!(node_pattern("web", "webId").is_err());
        assert!(node_pattern("source", "id}) DELETE n").is_err());
    }

    #[test]
    fn test_to_bolt_scalars() {
        assert!(matches!(to_bolt(&json!(null)), BoltType::Null(_)));
        assert!(matches!(to_bolt(&json!(true)), BoltType::Boolean(_)));
        assert!(matches!(to_bolt(&json!(42)), BoltType::Integer(_)));
        assert!(matches!(to_bolt(&json!(0.5)), BoltType::Float(_)));
        assert!(matches!(to_bolt(&json!("x")), BoltType::String(_)));
    }

    #[test]
    fn test_properties_to_bolt_keeps_every_key() {
        let props = json!({"sourceId": "s1", "size": 400, "tags": ["a", "b"]});
        let bolt = properties_to_bolt(props.as_object().unwrap());

        assert_eq!(bolt.value.len(), 3);
        match bolt.value.get(&BoltString::from("tags")) {
            Some(BoltType::List(list)) => assert_eq!(list.value.len(), 2),
            other => panic!("unexpected tags value: {:?}", other),
        }
    }
}
