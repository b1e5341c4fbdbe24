use async_trait::async_trait;

use crate::domain::{DomainError, Properties, SearchHit, SearchNamespace};

/// Similarity search over the hosted vector index.
#[async_trait]
pub trait VectorRepository: Send + Sync {
    async fn search(
        &self,
        namespace: SearchNamespace,
        vector: &[f32],
        top_k: usize,
        filter: Option<&Properties>,
    ) -> Result<Vec<SearchHit>, DomainError>;
}
