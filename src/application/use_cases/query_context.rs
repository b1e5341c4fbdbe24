use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::application::{EmbeddingService, VectorRepository};
use crate::domain::{ContextQuery, DomainError, SearchHit, SearchNamespace};

/// Semantic search over the `webs` or `sources` namespace of the vector index.
pub struct QueryContextUseCase {
    vector_repo: Arc<dyn VectorRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
}

impl QueryContextUseCase {
    pub fn new(
        vector_repo: Arc<dyn VectorRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            vector_repo,
            embedding_service,
        }
    }

    pub async fn execute(&self, query: ContextQuery) -> Result<Vec<SearchHit>, DomainError> {
        if query.query().trim().is_empty() {
            return Err(DomainError::invalid_input("query cannot be empty"));
        }

        info!(
            "Semantic search in '{}' for: {} (top_k={})",
            query.namespace(),
            query.query(),
            query.top_k()
        );
        let start_time = Instant::now();

        let vector = self.embedding_service.embed_query(query.query()).await?;
        let hits = self
            .vector_repo
            .search(query.namespace(), &vector, query.top_k(), query.filter())
            .await?;

        info!(
            "Found {} matches in {:.2}s",
            hits.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(hits)
    }

    pub async fn run_semantic_web_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, DomainError> {
        self.execute(
            ContextQuery::new(query)
                .with_namespace(SearchNamespace::Webs)
                .with_top_k(limit),
        )
        .await
    }

    /// Searches sources, optionally restricted to one web.
    pub async fn run_semantic_source_search(
        &self,
        query: &str,
        web_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let mut context_query = ContextQuery::new(query)
            .with_namespace(SearchNamespace::Sources)
            .with_top_k(limit);
        if let Some(web_id) = web_id {
            context_query = context_query.with_metadata_eq("webId", web_id);
        }
        self.execute(context_query).await
    }
}
