use std::sync::Arc;

use tracing::info;

use crate::application::GraphRepository;
use crate::domain::{Connection, DomainError, SOURCE_LABEL};

/// Creates, lists and removes `connection` relationships between sources.
pub struct ConnectSourcesUseCase {
    graph_repo: Arc<dyn GraphRepository>,
}

impl ConnectSourcesUseCase {
    pub fn new(graph_repo: Arc<dyn GraphRepository>) -> Self {
        Self { graph_repo }
    }

    pub async fn connect(&self, connection: Connection) -> Result<Connection, DomainError> {
        let created = self
            .graph_repo
            .create_relationship(&connection)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Cannot connect {} -> {}: source not found",
                    connection.from_source_id, connection.to_source_id
                ))
            })?;

        info!(
            "Connected source {} -> {} ({})",
            created.from_source_id, created.to_source_id, created.connection_id
        );
        Ok(created)
    }

    pub async fn connections_of(&self, source_id: &str) -> Result<Vec<Connection>, DomainError> {
        if self
            .graph_repo
            .find_node(SOURCE_LABEL, "sourceId", source_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found(format!(
                "Source not found: {}",
                source_id
            )));
        }
        self.graph_repo.relationships_of(source_id).await
    }

    pub async fn disconnect(&self, connection_id: &str) -> Result<(), DomainError> {
        if !self.graph_repo.delete_relationship(connection_id).await? {
            return Err(DomainError::not_found(format!(
                "Connection not found: {}",
                connection_id
            )));
        }
        info!("Removed connection {}", connection_id);
        Ok(())
    }
}
