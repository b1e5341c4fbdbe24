use std::sync::Arc;

use tracing::{info, warn};

use crate::application::GraphRepository;
use crate::domain::{is_read_only_cypher, DomainError, Properties};

/// Runs caller-supplied Cypher against the graph store.
pub struct GraphContextUseCase {
    graph_repo: Arc<dyn GraphRepository>,
    allow_writes: bool,
}

impl GraphContextUseCase {
    pub fn new(graph_repo: Arc<dyn GraphRepository>) -> Self {
        Self {
            graph_repo,
            allow_writes: false,
        }
    }

    pub fn with_writes_allowed(mut self, allow_writes: bool) -> Self {
        self.allow_writes = allow_writes;
        self
    }

    pub async fn execute(
        &self,
        cypher: &str,
        parameters: Properties,
    ) -> Result<Vec<Properties>, DomainError> {
        let cypher = cypher.trim();
        if cypher.is_empty() {
            return Err(DomainError::invalid_input("cypher statement cannot be empty"));
        }
        if !self.allow_writes && !is_read_only_cypher(cypher) {
            warn!("Rejected write statement: {}", cypher);
            return Err(DomainError::invalid_input(
                "only read-only Cypher is accepted for graph context",
            ));
        }

        let records = self.graph_repo.execute_query(cypher, parameters).await?;
        info!("Graph context query returned {} records", records.len());
        Ok(records)
    }
}
