use schemars::JsonSchema;
use serde::Serialize;

use crate::domain::{Connection, CreatedSource, Properties, SearchHit, SearchNamespace, Web};

/// Result of the create_new_source and add_chat_to_memory tools
#[derive(Debug, Serialize, JsonSchema)]
pub struct CreatedSourceOutput {
    /// ID of the new source node
    pub source_id: String,

    /// Web the source belongs to
    pub web_id: String,

    pub name: String,

    /// Source type (note, website, youtube, ...)
    pub source_type: String,

    /// Stored size estimate
    pub size: u64,

    /// RFC 3339 creation time
    pub created: String,

    /// Whether the web's source list now contains the source
    pub web_linked: bool,

    /// Number of web documents modified
    pub webs_modified: u64,
}

impl From<CreatedSource> for CreatedSourceOutput {
    fn from(created: CreatedSource) -> Self {
        let source = created.source;
        Self {
            source_id: source.source_id,
            web_id: source.web_id,
            name: source.name,
            source_type: source.source_type.as_str().to_string(),
            size: source.size,
            created: source.created.to_rfc3339(),
            web_linked: created.web_linked,
            webs_modified: created.webs_modified,
        }
    }
}

/// A web as returned by the create_web tool
#[derive(Debug, Serialize, JsonSchema)]
pub struct WebOutput {
    pub web_id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub visibility: String,
    pub tags: Vec<String>,
    pub source_count: usize,
    pub created: String,
}

impl From<Web> for WebOutput {
    fn from(web: Web) -> Self {
        Self {
            source_count: web.source_ids.len(),
            web_id: web.web_id,
            user_id: web.user_id,
            name: web.name,
            description: web.description,
            visibility: web.visibility.as_str().to_string(),
            tags: web.tags,
            created: web.created.to_rfc3339(),
        }
    }
}

/// Matches returned by the get_query_context tool
#[derive(Debug, Serialize, JsonSchema)]
pub struct QueryContextOutput {
    /// Namespace that was searched (webs or sources)
    pub namespace: String,

    /// Each match is its metadata with `id` and `score` merged in
    pub matches: Vec<serde_json::Value>,
}

impl QueryContextOutput {
    pub fn new(namespace: SearchNamespace, hits: Vec<SearchHit>) -> Self {
        Self {
            namespace: namespace.as_str().to_string(),
            matches: hits.into_iter().map(SearchHit::into_flat_json).collect(),
        }
    }
}

/// Records returned by the get_graph_context tool
#[derive(Debug, Serialize, JsonSchema)]
pub struct GraphContextOutput {
    pub count: usize,

    /// One object per record, keyed by the returned column names
    pub records: Vec<Properties>,
}

impl From<Vec<Properties>> for GraphContextOutput {
    fn from(records: Vec<Properties>) -> Self {
        Self {
            count: records.len(),
            records,
        }
    }
}

/// A connection relationship between two sources
#[derive(Debug, Serialize, JsonSchema)]
pub struct ConnectionOutput {
    pub connection_id: String,
    pub from_source_id: String,
    pub to_source_id: String,
    pub web_id: String,
    pub label: Option<String>,
    pub created: String,
}

impl From<Connection> for ConnectionOutput {
    fn from(connection: Connection) -> Self {
        Self {
            connection_id: connection.connection_id,
            from_source_id: connection.from_source_id,
            to_source_id: connection.to_source_id,
            web_id: connection.web_id,
            label: connection.label,
            created: connection.created.to_rfc3339(),
        }
    }
}
