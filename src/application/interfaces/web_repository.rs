use async_trait::async_trait;

use crate::domain::{DomainError, UpdateWeb, Web};

/// Document-store access to the `webs` collection.
#[async_trait]
pub trait WebRepository: Send + Sync {
    async fn ping(&self) -> Result<(), DomainError>;

    async fn insert(&self, web: &Web) -> Result<(), DomainError>;

    async fn find_by_id(&self, web_id: &str) -> Result<Option<Web>, DomainError>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Web>, DomainError>;

    /// Applies a partial update. Returns the updated web, or `None` if absent.
    async fn update(&self, web_id: &str, update: &UpdateWeb) -> Result<Option<Web>, DomainError>;

    /// Adds `source_id` to the web's `sourceIds` set.
    /// Returns the number of documents modified (0 if missing or already present).
    async fn add_source_id(&self, web_id: &str, source_id: &str) -> Result<u64, DomainError>;

    async fn remove_source_id(&self, web_id: &str, source_id: &str) -> Result<u64, DomainError>;

    async fn delete(&self, web_id: &str) -> Result<bool, DomainError>;

    async fn close(&self) {}
}
