use reqwest::Url;

use crate::domain::{DomainError, SearchNamespace, DEFAULT_TOP_K};

pub const VECTOR_SCHEME: &str = "pinecone";
pub const GRAPH_SCHEME: &str = "neo4j";

pub const QUERY_CONTEXT_TEMPLATE: &str = "pinecone://{namespace}?query={query}&k={k}";
pub const GRAPH_CONTEXT_TEMPLATE: &str = "neo4j://graph?cypher={cypher}";

/// A parsed `resources/read` URI.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRequest {
    QueryContext {
        namespace: SearchNamespace,
        query: String,
        k: usize,
    },
    GraphContext {
        cypher: String,
    },
}

impl ResourceRequest {
    pub fn parse(uri: &str) -> Result<Self, DomainError> {
        let url = Url::parse(uri)
            .map_err(|e| DomainError::invalid_input(format!("Invalid resource URI {}: {}", uri, e)))?;

        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };

        match url.scheme() {
            VECTOR_SCHEME => {
                let namespace = match url.host_str() {
                    Some(host) if !host.is_empty() => SearchNamespace::parse(host)?,
                    _ => SearchNamespace::default(),
                };
                let query = param("query")
                    .filter(|q| !q.trim().is_empty())
                    .ok_or_else(|| DomainError::invalid_input("query parameter is required"))?;
                let k = match param("k") {
                    Some(k) => k
                        .parse()
                        .map_err(|_| DomainError::invalid_input(format!("k must be a number, got {}", k)))?,
                    None => DEFAULT_TOP_K,
                };
                Ok(Self::QueryContext { namespace, query, k })
            }
            GRAPH_SCHEME => {
                let cypher = param("cypher")
                    .filter(|c| !c.trim().is_empty())
                    .ok_or_else(|| DomainError::invalid_input("cypher parameter is required"))?;
                Ok(Self::GraphContext { cypher })
            }
            other => Err(DomainError::not_found(format!(
                "No resource handler for scheme {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_context_uri() {
        let request =
            ResourceRequest::parse("pinecone://webs?query=graph%20theory&k=3").unwrap();
        assert_eq!(
            request,
            ResourceRequest::QueryContext {
                namespace: SearchNamespace::Webs,
                query: "graph theory".to_string(),
                k: 3,
            }
        );
    }

    #[test]
    fn test_query_context_defaults_k() {
        match ResourceRequest::parse("pinecone://sources?query=rust").unwrap() {
            ResourceRequest::QueryContext { k, namespace, .. } => {
                assert_eq!(k, DEFAULT_TOP_K);
                assert_eq!(namespace, SearchNamespace::Sources);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_parse_graph_context_uri() {
        let request =
            ResourceRequest::parse("neo4j://graph?cypher=MATCH%20(n)%20RETURN%20n").unwrap();
        assert_eq!(
            request,
            ResourceRequest::GraphContext {
                cypher: "MATCH (n) RETURN n".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_bad_uris() {
        assert!(ResourceRequest::parse("pinecone://sources").unwrap_err().is_invalid_input());
        assert!(ResourceRequest::parse("pinecone://sources?query=a&k=x")
            .unwrap_err()
            .is_invalid_input());
        assert!(ResourceRequest::parse("pinecone://nowhere?query=a")
            .unwrap_err()
            .is_invalid_input());
        assert!(ResourceRequest::parse("file:///etc/passwd").unwrap_err().is_not_found());
    }
}
