use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::VectorRepository;
use crate::domain::{DomainError, Properties, SearchHit, SearchNamespace};

#[derive(Clone)]
struct StoredVector {
    values: Vec<f32>,
    metadata: Properties,
}

/// Brute-force cosine search over vectors held per namespace.
pub struct InMemoryVectorRepository {
    namespaces: Arc<Mutex<HashMap<SearchNamespace, HashMap<String, StoredVector>>>>,
}

impl InMemoryVectorRepository {
    pub fn new() -> Self {
        Self {
            namespaces: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Inserts or replaces the vector stored under `id`.
    pub async fn upsert(
        &self,
        namespace: SearchNamespace,
        id: impl Into<String>,
        values: Vec<f32>,
        metadata: Properties,
    ) {
        let id = id.into();
        let mut namespaces = self.namespaces.lock().await;
        namespaces
            .entry(namespace)
            .or_default()
            .insert(id.clone(), StoredVector { values, metadata });
        debug!("Upserted vector {} into namespace {}", id, namespace);
    }
}

impl Default for InMemoryVectorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorRepository for InMemoryVectorRepository {
    async fn search(
        &self,
        namespace: SearchNamespace,
        vector: &[f32],
        top_k: usize,
        filter: Option<&Properties>,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let namespaces = self.namespaces.lock().await;
        let Some(stored) = namespaces.get(&namespace) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<SearchHit> = stored
            .iter()
            .map(|(id, v)| {
                SearchHit::new(
                    id.clone(),
                    cosine_similarity(vector, &v.values),
                    v.metadata.clone(),
                )
            })
            .filter(|hit| filter.map_or(true, |f| hit.matches(f)))
            .collect();

        hits.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);
        Ok(hits)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(web_id: &str) -> Properties {
        json!({"webId": web_id}).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity_and_truncates() {
        let repo = InMemoryVectorRepository::new();
        repo.upsert(SearchNamespace::Sources, "near", vec![1.0, 0.0], meta("w1"))
            .await;
        repo.upsert(SearchNamespace::Sources, "far", vec![0.0, 1.0], meta("w1"))
            .await;
        repo.upsert(SearchNamespace::Sources, "mid", vec![1.0, 1.0], meta("w1"))
            .await;

        let hits = repo
            .search(SearchNamespace::Sources, &[1.0, 0.0], 2, None)
            .await
            .unwrap();

        let ids: Vec<&str> = hits.iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated_and_filtered() {
        let repo = InMemoryVectorRepository::new();
        repo.upsert(SearchNamespace::Webs, "web", vec![1.0], meta("w1"))
            .await;
        repo.upsert(SearchNamespace::Sources, "s1", vec![1.0], meta("w1"))
            .await;
        repo.upsert(SearchNamespace::Sources, "s2", vec![1.0], meta("w2"))
            .await;

        let filter = meta("w2");
        let hits = repo
            .search(SearchNamespace::Sources, &[1.0], 10, Some(&filter))
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), "s2");
    }
}
