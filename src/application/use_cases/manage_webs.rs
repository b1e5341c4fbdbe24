use std::sync::Arc;

use tracing::info;

use crate::application::WebRepository;
use crate::domain::{CreateWeb, DomainError, UpdateWeb, Web};

pub struct CreateWebUseCase {
    web_repo: Arc<dyn WebRepository>,
}

impl CreateWebUseCase {
    pub fn new(web_repo: Arc<dyn WebRepository>) -> Self {
        Self { web_repo }
    }

    pub async fn execute(&self, payload: CreateWeb, user_id: &str) -> Result<Web, DomainError> {
        if user_id.trim().is_empty() {
            return Err(DomainError::invalid_input("user ID is required"));
        }
        payload.validate()?;

        let web = Web::create(payload, user_id);
        self.web_repo.insert(&web).await?;

        info!("Created web {} ({}) for user {}", web.name, web.web_id, user_id);
        Ok(web)
    }
}

pub struct UpdateWebUseCase {
    web_repo: Arc<dyn WebRepository>,
}

impl UpdateWebUseCase {
    pub fn new(web_repo: Arc<dyn WebRepository>) -> Self {
        Self { web_repo }
    }

    pub async fn execute(&self, web_id: &str, update: UpdateWeb) -> Result<Web, DomainError> {
        if update.is_empty() {
            return Err(DomainError::invalid_input("nothing to update"));
        }
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DomainError::invalid_input("web name cannot be empty"));
            }
        }

        let web = self
            .web_repo
            .update(web_id, &update)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Web not found: {}", web_id)))?;

        info!("Updated web {}", web_id);
        Ok(web)
    }
}

pub struct DeleteWebUseCase {
    web_repo: Arc<dyn WebRepository>,
}

impl DeleteWebUseCase {
    pub fn new(web_repo: Arc<dyn WebRepository>) -> Self {
        Self { web_repo }
    }

    /// Removes the web document only; its source nodes stay in the graph.
    pub async fn execute(&self, web_id: &str) -> Result<(), DomainError> {
        if !self.web_repo.delete(web_id).await? {
            return Err(DomainError::not_found(format!("Web not found: {}", web_id)));
        }
        info!("Deleted web {}", web_id);
        Ok(())
    }
}

pub struct ListWebsUseCase {
    web_repo: Arc<dyn WebRepository>,
}

impl ListWebsUseCase {
    pub fn new(web_repo: Arc<dyn WebRepository>) -> Self {
        Self { web_repo }
    }

    pub async fn execute(&self, user_id: &str) -> Result<Vec<Web>, DomainError> {
        self.web_repo.list_by_user(user_id).await
    }

    pub async fn get_by_id(&self, web_id: &str) -> Result<Option<Web>, DomainError> {
        self.web_repo.find_by_id(web_id).await
    }
}
