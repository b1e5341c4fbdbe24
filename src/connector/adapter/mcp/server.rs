use std::sync::Arc;

use rmcp::handler::server::router::prompt::PromptRouter;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, GetPromptRequestParams, GetPromptResult, Implementation,
    ListPromptsResult, ListResourceTemplatesResult, PaginatedRequestParams, PromptMessage,
    PromptMessageRole, ProtocolVersion, ReadResourceRequestParams, ReadResourceResult,
    ResourceContents, ResourceTemplate, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::ErrorData as McpError;
use rmcp::{prompt, prompt_handler, prompt_router, tool, tool_handler, tool_router};
use rmcp::{RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::connector::api::Container;
use crate::domain::{
    ChatMessage, Connection, ContextQuery, CreateSource, CreateWeb, DomainError, Properties,
    SearchNamespace, SourceType, Visibility, DEFAULT_TOP_K,
};

use super::resources::{ResourceRequest, GRAPH_CONTEXT_TEMPLATE, QUERY_CONTEXT_TEMPLATE};
use super::tools::{
    ConnectionOutput, CreatedSourceOutput, GraphContextOutput, QueryContextOutput, WebOutput,
};

fn default_k() -> usize {
    DEFAULT_TOP_K
}

/// Input parameters for the add_chat_to_memory tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddChatToMemoryInput {
    /// Owner of the note
    pub user_id: String,

    /// Web the note is stored in
    pub web_id: String,

    /// Conversation turns, oldest first
    pub messages: Vec<ChatMessage>,

    /// Summary placed above the transcript; its first line becomes the note title
    pub summary: Option<String>,
}

/// Input parameters for the create_new_source tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateNewSourceInput {
    pub user_id: String,
    pub web_id: String,

    /// Display name of the source
    pub name: String,

    /// Text content; size is derived from it
    pub content: String,

    /// note, website, youtube or any other type (default: note)
    #[serde(rename = "type")]
    pub source_type: Option<String>,

    pub url: Option<String>,
}

/// Input parameters for the create_web tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateWebInput {
    pub user_id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// private, public or invite (default: private)
    pub visibility: Option<String>,

    pub tags: Option<Vec<String>>,
}

/// Input parameters for the get_query_context tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryContextInput {
    /// Natural language query to embed and search with
    pub query: String,

    /// Number of neighbours to return (default: 10, server cap: 100)
    #[serde(default = "default_k")]
    pub k: usize,

    /// "sources" (default) or "webs"
    pub namespace: Option<String>,

    /// Only return matches whose metadata webId equals this value
    pub web_id: Option<String>,
}

/// Input parameters for the get_graph_context tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GraphContextInput {
    /// Read-only Cypher statement
    pub cypher: String,

    /// Values bound to `$name` placeholders in the statement
    pub parameters: Option<Properties>,
}

/// Input parameters for the connect_sources tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConnectSourcesInput {
    pub user_id: String,
    pub web_id: String,
    pub from_source_id: String,
    pub to_source_id: String,

    /// Optional description of how the two sources relate
    pub label: Option<String>,
}

/// Arguments for the note_summary_prompt prompt
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteSummaryPromptArgs {
    /// Conversation to summarize, if already at hand
    pub transcript: Option<String>,
}

/// MCP Server that exposes webs, sources and their graph/vector context
#[derive(Clone)]
pub struct SpydrMcpServer {
    container: Arc<Container>,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

/// Logs the failure and maps caller mistakes to `invalid_params`.
fn to_mcp_error(action: &str, err: DomainError) -> McpError {
    error!("{} failed: {}", action, err);
    if err.is_client_error() {
        McpError::invalid_params(format!("{} failed: {}", action, err), None)
    } else {
        McpError::internal_error(format!("{} failed: {}", action, err), None)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize results: {}", e), None)
    })?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl SpydrMcpServer {
    pub fn new(container: Arc<Container>) -> Self {
        Self {
            container,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    async fn query_context(
        &self,
        query: &str,
        k: usize,
        namespace: SearchNamespace,
        web_id: Option<&str>,
    ) -> Result<QueryContextOutput, DomainError> {
        let mut context_query = ContextQuery::new(query)
            .with_top_k(k)
            .with_namespace(namespace);
        if let Some(web_id) = web_id {
            context_query = context_query.with_metadata_eq("webId", web_id);
        }

        let hits = self
            .container
            .query_context_use_case()
            .execute(context_query)
            .await?;
        Ok(QueryContextOutput::new(namespace, hits))
    }

    async fn graph_context(
        &self,
        cypher: &str,
        parameters: Properties,
    ) -> Result<GraphContextOutput, DomainError> {
        let records = self
            .container
            .graph_context_use_case()
            .execute(cypher, parameters)
            .await?;
        Ok(records.into())
    }

    /// Save a chat conversation as a note source in a web. The transcript is stored below the
    /// optional summary, and the note is linked into the web's source list.
    #[tool(name = "add_chat_to_memory")]
    async fn add_chat_to_memory(
        &self,
        params: Parameters<AddChatToMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = params.0;

        let created = self
            .container
            .add_chat_to_memory_use_case()
            .execute(&input.user_id, &input.web_id, input.messages, input.summary)
            .await
            .map_err(|e| to_mcp_error("add_chat_to_memory", e))?;

        json_result(&CreatedSourceOutput::from(created))
    }

    /// Create a source (note, website, video, ...) in a web. Writes a source node to the graph
    /// and adds its ID to the web; web_linked is false if the second step did not happen.
    #[tool(name = "create_new_source")]
    async fn create_new_source(
        &self,
        params: Parameters<CreateNewSourceInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = params.0;

        let source_type = input
            .source_type
            .as_deref()
            .map(SourceType::parse)
            .unwrap_or_default();
        let mut payload = CreateSource::new(
            input.user_id,
            input.web_id,
            input.name,
            input.content,
            source_type,
        );
        if let Some(url) = input.url {
            payload = payload.with_url(url);
        }

        let created = self
            .container
            .create_source_use_case()
            .execute(payload)
            .await
            .map_err(|e| to_mcp_error("create_new_source", e))?;

        json_result(&CreatedSourceOutput::from(created))
    }

    /// Create a new, empty web owned by the given user.
    #[tool(name = "create_web")]
    async fn create_web(
        &self,
        params: Parameters<CreateWebInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = params.0;

        let visibility = input
            .visibility
            .as_deref()
            .map(Visibility::parse)
            .transpose()
            .map_err(|e| to_mcp_error("create_web", e))?
            .unwrap_or_default();
        let payload = CreateWeb::new(input.name, input.description, visibility)
            .with_tags(input.tags.unwrap_or_default());

        let web = self
            .container
            .create_web_use_case()
            .execute(payload, &input.user_id)
            .await
            .map_err(|e| to_mcp_error("create_web", e))?;

        json_result(&WebOutput::from(web))
    }

    /// Semantic search over sources (default) or webs. The query is embedded and matched against
    /// the vector index; each match is returned as its metadata plus id and score.
    #[tool(name = "get_query_context")]
    async fn get_query_context(
        &self,
        params: Parameters<QueryContextInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = params.0;

        let namespace = match input.namespace.as_deref() {
            Some(ns) => SearchNamespace::parse(ns)
                .map_err(|e| to_mcp_error("get_query_context", e))?,
            None => SearchNamespace::default(),
        };

        let output = self
            .query_context(&input.query, input.k, namespace, input.web_id.as_deref())
            .await
            .map_err(|e| to_mcp_error("get_query_context", e))?;

        json_result(&output)
    }

    /// Run a read-only Cypher query against the source graph and return each record as an object.
    #[tool(name = "get_graph_context")]
    async fn get_graph_context(
        &self,
        params: Parameters<GraphContextInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = params.0;

        let output = self
            .graph_context(&input.cypher, input.parameters.unwrap_or_default())
            .await
            .map_err(|e| to_mcp_error("get_graph_context", e))?;

        json_result(&output)
    }

    /// Connect two existing sources with a connection relationship.
    #[tool(name = "connect_sources")]
    async fn connect_sources(
        &self,
        params: Parameters<ConnectSourcesInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = params.0;

        let mut connection = Connection::new(
            input.user_id,
            input.web_id,
            input.from_source_id,
            input.to_source_id,
        )
        .map_err(|e| to_mcp_error("connect_sources", e))?;
        if let Some(label) = input.label {
            connection = connection.with_label(label);
        }

        let created = self
            .container
            .connect_sources_use_case()
            .connect(connection)
            .await
            .map_err(|e| to_mcp_error("connect_sources", e))?;

        json_result(&ConnectionOutput::from(created))
    }
}

const NOTE_SUMMARY_INSTRUCTIONS: &str = "Summarize the conversation below into a note worth \
keeping. Start with a single-line title, then a short paragraph covering the key facts, \
decisions and open questions. Keep names, links and numbers exactly as written. When done, \
call add_chat_to_memory with the messages and your summary.";

#[prompt_router]
impl SpydrMcpServer {
    /// Instructions for turning a chat into a note before calling add_chat_to_memory
    #[prompt(name = "note_summary_prompt")]
    async fn note_summary_prompt(
        &self,
        params: Parameters<NoteSummaryPromptArgs>,
    ) -> Result<Vec<PromptMessage>, McpError> {
        let text = match params.0.transcript {
            Some(transcript) if !transcript.trim().is_empty() => {
                format!("{}\n\n{}", NOTE_SUMMARY_INSTRUCTIONS, transcript.trim())
            }
            _ => NOTE_SUMMARY_INSTRUCTIONS.to_string(),
        };

        Ok(vec![PromptMessage::new_text(PromptMessageRole::User, text)])
    }
}

fn resource_templates() -> Result<Vec<ResourceTemplate>, McpError> {
    serde_json::from_value(json!([
        {
            "uriTemplate": QUERY_CONTEXT_TEMPLATE,
            "name": "query_context",
            "description": "Semantic search matches for a query in the webs or sources namespace",
            "mimeType": "application/json"
        },
        {
            "uriTemplate": GRAPH_CONTEXT_TEMPLATE,
            "name": "graph_context",
            "description": "Records returned by a read-only Cypher query",
            "mimeType": "application/json"
        }
    ]))
    .map_err(|e| McpError::internal_error(format!("Invalid resource template: {}", e), None))
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for SpydrMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Knowledge-web server. Webs are user-owned collections of sources (notes, \
                 websites, videos). Use create_web and create_new_source to add content, \
                 add_chat_to_memory to save a conversation as a note, get_query_context for \
                 semantic search and get_graph_context for read-only Cypher over the source \
                 graph. The same lookups are available as pinecone:// and neo4j:// resources."
                    .into(),
            ),
        }
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: resource_templates()?,
            next_cursor: None,
            ..Default::default()
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = request.uri;
        info!("Reading resource {}", uri);

        let request = ResourceRequest::parse(&uri).map_err(|e| {
            if e.is_not_found() {
                McpError::resource_not_found(e.to_string(), Some(json!({ "uri": uri })))
            } else {
                to_mcp_error("read_resource", e)
            }
        })?;

        let json = match request {
            ResourceRequest::QueryContext {
                namespace,
                query,
                k,
            } => {
                let output = self
                    .query_context(&query, k, namespace, None)
                    .await
                    .map_err(|e| to_mcp_error("read_resource", e))?;
                serde_json::to_string_pretty(&output)
            }
            ResourceRequest::GraphContext { cypher } => {
                let output = self
                    .graph_context(&cypher, Properties::new())
                    .await
                    .map_err(|e| to_mcp_error("read_resource", e))?;
                serde_json::to_string_pretty(&output)
            }
        }
        .map_err(|e| McpError::internal_error(format!("Failed to serialize results: {}", e), None))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(json, uri)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::api::ContainerConfig;

    async fn memory_server() -> SpydrMcpServer {
        let container = Container::new(ContainerConfig {
            memory_storage: true,
            ..Default::default()
        })
        .await
        .unwrap();
        SpydrMcpServer::new(Arc::new(container))
    }

    #[test]
    fn test_resource_templates_deserialize() {
        let templates = resource_templates().unwrap();
        assert_eq!(templates.len(), 2);
    }

    #[test]
    fn test_query_context_input_defaults_k() {
        let input: QueryContextInput = serde_json::from_value(json!({"query": "rust"})).unwrap();
        assert_eq!(input.k, DEFAULT_TOP_K);
        assert!(input.namespace.is_none());
    }

    #[test]
    fn test_client_errors_map_to_invalid_params() {
        let err = to_mcp_error("x", DomainError::invalid_input("bad"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let err = to_mcp_error("x", DomainError::storage("down"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_create_web_then_source_through_tools() {
        let server = memory_server().await;

        let web = server
            .create_web(Parameters(CreateWebInput {
                user_id: "user-1".to_string(),
                name: "Research".to_string(),
                description: String::new(),
                visibility: None,
                tags: None,
            }))
            .await
            .unwrap();
        assert_eq!(web.is_error, Some(false));

        let webs = server
            .container
            .list_webs_use_case()
            .execute("user-1")
            .await
            .unwrap();
        let web_id = webs[0].web_id.clone();

        let result = server
            .create_new_source(Parameters(CreateNewSourceInput {
                user_id: "user-1".to_string(),
                web_id: web_id.clone(),
                name: "Paper".to_string(),
                content: "abstract".to_string(),
                source_type: Some("website".to_string()),
                url: Some("https://example.org".to_string()),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));

        let stored = server
            .container
            .list_webs_use_case()
            .get_by_id(&web_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.source_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_create_web_rejects_unknown_visibility() {
        let server = memory_server().await;

        let err = server
            .create_web(Parameters(CreateWebInput {
                user_id: "user-1".to_string(),
                name: "Research".to_string(),
                description: String::new(),
                visibility: Some("pubilc".to_string()),
                tags: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let webs = server
            .container
            .list_webs_use_case()
            .execute("user-1")
            .await
            .unwrap();
        assert!(webs.is_empty());
    }

    #[tokio::test]
    async fn test_graph_context_rejects_writes() {
        let server = memory_server().await;

        let err = server
            .get_graph_context(Parameters(GraphContextInput {
                cypher: "MATCH (n) DETACH DELETE n".to_string(),
                parameters: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_note_summary_prompt_includes_transcript() {
        let server = memory_server().await;

        let messages = server
            .note_summary_prompt(Parameters(NoteSummaryPromptArgs {
                transcript: Some("user: hi".to_string()),
            }))
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
        let text = serde_json::to_string(&messages[0]).unwrap();
        assert!(text.contains("user: hi"));
    }
}
