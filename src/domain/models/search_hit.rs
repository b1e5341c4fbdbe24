use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Default number of neighbours returned by a semantic search.
pub const DEFAULT_TOP_K: usize = 10;
/// Server-side cap on neighbours per search.
pub const MAX_TOP_K: usize = 100;

/// Vector index namespace a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchNamespace {
    Webs,
    #[default]
    Sources,
}

impl SearchNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchNamespace::Webs => "webs",
            SearchNamespace::Sources => "sources",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "webs" | "web" => Ok(SearchNamespace::Webs),
            "sources" | "source" => Ok(SearchNamespace::Sources),
            other => Err(DomainError::invalid_input(format!(
                "unknown search namespace '{}' (expected 'webs' or 'sources')",
                other
            ))),
        }
    }
}

impl fmt::Display for SearchNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A semantic search request against the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextQuery {
    query: String,
    top_k: usize,
    namespace: SearchNamespace,
    filter: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ContextQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            namespace: SearchNamespace::default(),
            filter: None,
        }
    }

    /// Clamped to `1..=MAX_TOP_K`.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.clamp(1, MAX_TOP_K);
        self
    }

    pub fn with_namespace(mut self, namespace: SearchNamespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_filter(mut self, filter: serde_json::Map<String, serde_json::Value>) -> Self {
        if !filter.is_empty() {
            self.filter = Some(filter);
        }
        self
    }

    /// Adds an equality condition on a metadata key.
    pub fn with_metadata_eq(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.filter
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn namespace(&self) -> SearchNamespace {
        self.namespace
    }

    pub fn filter(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.filter.as_ref()
    }
}

/// One nearest-neighbour match: the vector ID plus its stored metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    id: String,
    score: f32,
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl SearchHit {
    pub fn new(
        id: impl Into<String>,
        score: f32,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            score,
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn metadata(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.metadata
    }

    /// Checks every filter key for equality against the metadata.
    pub fn matches(&self, filter: &serde_json::Map<String, serde_json::Value>) -> bool {
        filter
            .iter()
            .all(|(key, expected)| self.metadata.get(key) == Some(expected))
    }

    /// Metadata object with `id` and `score` merged in.
    pub fn into_flat_json(self) -> serde_json::Value {
        let mut map = self.metadata;
        map.insert("id".to_string(), serde_json::Value::String(self.id));
        if let Some(score) = serde_json::Number::from_f64(self.score as f64) {
            map.insert("score".to_string(), serde_json::Value::Number(score));
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_k_is_clamped() {
        assert_eq!(ContextQuery::new("q").with_top_k(0).top_k(), 1);
        assert_eq!(ContextQuery::new("q").with_top_k(500).top_k(), MAX_TOP_K);
        assert_eq!(ContextQuery::new("q").top_k(), DEFAULT_TOP_K);
    }

    #[test]
    fn test_namespace_parse() {
        assert_eq!(SearchNamespace::parse("Webs").unwrap(), SearchNamespace::Webs);
        assert_eq!(SearchNamespace::parse("source").unwrap(), SearchNamespace::Sources);
        assert!(SearchNamespace::parse("images").is_err());
    }

    #[test]
    fn test_flat_json_merges_id_over_metadata() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("name".to_string(), json!("Rust book"));
        metadata.insert("id".to_string(), json!("stale"));
        let hit = SearchHit::new("vec-1", 0.5, metadata);

        let flat = hit.into_flat_json();
        assert_eq!(flat["id"], "vec-1");
        assert_eq!(flat["name"], "Rust book");
        assert_eq!(flat["score"], 0.5);
    }

    #[test]
    fn test_matches_filter() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("webId".to_string(), json!("w1"));
        let hit = SearchHit::new("v", 1.0, metadata);

        let query = ContextQuery::new("q").with_metadata_eq("webId", "w1");
        assert!(hit.matches(query.filter().unwrap()));

        let query = ContextQuery::new("q").with_metadata_eq("webId", "w2");
        assert!(!hit.matches(query.filter().unwrap()));
    }
}
