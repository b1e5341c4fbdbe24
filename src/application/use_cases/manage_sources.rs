use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use crate::application::{GraphRepository, WebRepository};
use crate::domain::{DomainError, Properties, Source, UpdateSource, SOURCE_LABEL};

const SOURCE_KEY: &str = "sourceId";

pub struct UpdateSourceUseCase {
    graph_repo: Arc<dyn GraphRepository>,
}

impl UpdateSourceUseCase {
    pub fn new(graph_repo: Arc<dyn GraphRepository>) -> Self {
        Self { graph_repo }
    }

    pub async fn execute(&self, source_id: &str, update: UpdateSource) -> Result<Source, DomainError> {
        let mut properties = Properties::new();
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(DomainError::invalid_input("source name cannot be empty"));
            }
            properties.insert("name".to_string(), name.into());
        }
        if let Some(content) = update.content {
            properties.insert("size".to_string(), crate::domain::content_size(&content).into());
            properties.insert("content".to_string(), content.into());
        }
        if properties.is_empty() {
            return Err(DomainError::invalid_input("nothing to update"));
        }
        properties.insert("updated".to_string(), Utc::now().to_rfc3339().into());

        let stored = self
            .graph_repo
            .update_node(SOURCE_LABEL, SOURCE_KEY, source_id, properties)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Source not found: {}", source_id)))?;

        info!("Updated source {}", source_id);
        Source::from_properties(stored)
    }
}

/// Deletes a source node, then drops its ID from the owning web.
/// Same best-effort ordering as creation, in reverse.
pub struct DeleteSourceUseCase {
    graph_repo: Arc<dyn GraphRepository>,
    web_repo: Arc<dyn WebRepository>,
}

impl DeleteSourceUseCase {
    pub fn new(graph_repo: Arc<dyn GraphRepository>, web_repo: Arc<dyn WebRepository>) -> Self {
        Self {
            graph_repo,
            web_repo,
        }
    }

    pub async fn execute(&self, source_id: &str) -> Result<(), DomainError> {
        let source = self
            .graph_repo
            .find_node(SOURCE_LABEL, SOURCE_KEY, source_id)
            .await?
            .map(Source::from_properties)
            .transpose()?
            .ok_or_else(|| DomainError::not_found(format!("Source not found: {}", source_id)))?;

        self.graph_repo
            .delete_node(SOURCE_LABEL, SOURCE_KEY, source_id)
            .await?;
        info!("Deleted source {} from graph", source_id);

        if let Err(e) = self
            .web_repo
            .remove_source_id(&source.web_id, source_id)
            .await
        {
            error!(
                "Source {} deleted from graph but web {} still lists it: {}",
                source_id, source.web_id, e
            );
        }
        Ok(())
    }
}
