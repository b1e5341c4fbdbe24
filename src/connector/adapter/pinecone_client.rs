use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{EmbeddingService, VectorRepository};
use crate::domain::{DomainError, Properties, SearchHit, SearchNamespace};

pub const DEFAULT_API_URL: &str = "https://api.pinecone.io";
pub const EMBEDDING_MODEL: &str = "multilingual-e5-large";
const API_VERSION: &str = "2025-01";

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    parameters: EmbedParameters<'a>,
    inputs: Vec<EmbedInput<'a>>,
}

#[derive(Serialize)]
struct EmbedParameters<'a> {
    input_type: &'a str,
    truncate: &'a str,
}

#[derive(Serialize)]
struct EmbedInput<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    namespace: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Properties>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Properties>,
}

/// HTTP client for Pinecone's hosted inference and index query APIs.
///
/// Embeddings come from the inference endpoint (`POST {api}/embed`) with
/// `input_type = "query"`. Queries go to the index's data-plane host, which is
/// resolved once through `GET {api}/indexes/{name}` unless supplied up front.
pub struct PineconeClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    index_name: String,
    /// Data-plane base URL, e.g. `https://my-index-abc123.svc.pinecone.io`.
    index_url: String,
}

impl PineconeClient {
    pub async fn connect(
        api_key: impl Into<String>,
        index_name: impl Into<String>,
        api_url: Option<&str>,
        index_host: Option<&str>,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        let mut pinecone = Self {
            client,
            api_key: api_key.into(),
            api_url: api_url
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            index_name: index_name.into(),
            index_url: String::new(),
        };

        let host = match index_host {
            Some(host) => host.to_string(),
            None => pinecone.describe_index_host().await?,
        };
        pinecone.index_url = index_url(&host);

        debug!(
            "Using Pinecone index {} at {}",
            pinecone.index_name, pinecone.index_url
        );
        Ok(pinecone)
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn describe_index_host(&self) -> Result<String, DomainError> {
        let url = format!("{}/indexes/{}", self.api_url, self.index_name);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Pinecone: describe index failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Pinecone: describe index returned {status}: {body}");
            return Err(DomainError::storage(format!(
                "Pinecone: index '{}' not available ({status})",
                self.index_name
            )));
        }

        let described: DescribeIndexResponse = response.json().await.map_err(|e| {
            DomainError::storage(format!("Pinecone: failed to parse index description: {e}"))
        })?;
        Ok(described.host)
    }

    /// Embedding for a query string, as produced by `multilingual-e5-large`.
    pub async fn get_query_embedding(&self, query: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbedRequest {
            model: EMBEDDING_MODEL,
            parameters: EmbedParameters {
                input_type: "query",
                truncate: "END",
            },
            inputs: vec![EmbedInput { text: query }],
        };

        let response = self
            .client
            .post(format!("{}/embed", self.api_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::embedding(format!("Pinecone: embed request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Pinecone: embed returned {status}: {body}");
            return Err(DomainError::embedding(format!(
                "Pinecone: embed returned {status}"
            )));
        }

        let embedded: EmbedResponse = response.json().await.map_err(|e| {
            DomainError::embedding(format!("Pinecone: failed to parse embeddings: {e}"))
        })?;

        embedded
            .data
            .into_iter()
            .next()
            .map(|d| d.values)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DomainError::embedding("Pinecone: no embedding returned"))
    }
}

fn index_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait]
impl EmbeddingService for PineconeClient {
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DomainError> {
        self.get_query_embedding(query).await
    }

    fn model_name(&self) -> &str {
        EMBEDDING_MODEL
    }
}

#[async_trait]
impl VectorRepository for PineconeClient {
    async fn search(
        &self,
        namespace: SearchNamespace,
        vector: &[f32],
        top_k: usize,
        filter: Option<&Properties>,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            namespace: namespace.as_str(),
            filter: filter.filter(|f| !f.is_empty()),
        };

        let response = self
            .client
            .post(format!("{}/query", self.index_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Pinecone: query failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Pinecone: query returned {status}: {body}");
            return Err(DomainError::storage(format!(
                "Pinecone: query returned {status}"
            )));
        }

        let result: QueryResponse = response
            .json()
            .await
            .map_err(|e| DomainError::storage(format!("Pinecone: failed to parse matches: {e}")))?;

        debug!(
            "Pinecone returned {} matches from namespace {}",
            result.matches.len(),
            namespace
        );

        Ok(result
            .matches
            .into_iter()
            .map(|m| SearchHit::new(m.id, m.score, m.metadata.unwrap_or_default()))
            .collect())
    }
}
