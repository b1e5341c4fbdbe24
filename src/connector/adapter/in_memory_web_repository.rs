use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::WebRepository;
use crate::domain::{DomainError, UpdateWeb, Web};

/// Process-local stand-in for the `webs` collection.
pub struct InMemoryWebRepository {
    webs: Arc<Mutex<HashMap<String, Web>>>,
}

impl InMemoryWebRepository {
    pub fn new() -> Self {
        Self {
            webs: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryWebRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebRepository for InMemoryWebRepository {
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn insert(&self, web: &Web) -> Result<(), DomainError> {
        let mut webs = self.webs.lock().await;
        webs.insert(web.web_id.clone(), web.clone());
        debug!("Saved web {} to memory", web.web_id);
        Ok(())
    }

    async fn find_by_id(&self, web_id: &str) -> Result<Option<Web>, DomainError> {
        Ok(self.webs.lock().await.get(web_id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Web>, DomainError> {
        let webs = self.webs.lock().await;
        let mut owned: Vec<Web> = webs
            .values()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(owned)
    }

    async fn update(&self, web_id: &str, update: &UpdateWeb) -> Result<Option<Web>, DomainError> {
        let mut webs = self.webs.lock().await;
        Ok(webs.get_mut(web_id).map(|web| {
            web.apply(update);
            web.clone()
        }))
    }

    async fn add_source_id(&self, web_id: &str, source_id: &str) -> Result<u64, DomainError> {
        let mut webs = self.webs.lock().await;
        match webs.get_mut(web_id) {
            Some(web) if !web.contains_source(source_id) => {
                web.source_ids.push(source_id.to_string());
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn remove_source_id(&self, web_id: &str, source_id: &str) -> Result<u64, DomainError> {
        let mut webs = self.webs.lock().await;
        match webs.get_mut(web_id) {
            Some(web) if web.contains_source(source_id) => {
                web.source_ids.retain(|id| id != source_id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete(&self, web_id: &str) -> Result<bool, DomainError> {
        Ok(self.webs.lock().await.remove(web_id).is_some())
    }
}
