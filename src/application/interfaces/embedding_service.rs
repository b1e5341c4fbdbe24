use async_trait::async_trait;

use crate::domain::DomainError;

/// Turns query text into a vector for nearest-neighbour search.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DomainError>;

    fn model_name(&self) -> &str;
}
