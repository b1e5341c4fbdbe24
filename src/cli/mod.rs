use clap::{Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start MCP (Model Context Protocol) server for integration with AI tools
    Mcp {
        /// Run as HTTP server on specified port (e.g., --http 8080)
        #[arg(long)]
        http: Option<u16>,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Check that the document and graph stores answer
    Ping,

    CreateWeb {
        name: String,

        #[arg(short, long)]
        user: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// private, public or invite
        #[arg(long, default_value = "private")]
        visibility: String,

        #[arg(short, long)]
        tag: Option<Vec<String>>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    UpdateWeb {
        web_id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        visibility: Option<String>,

        /// Enable or disable AI-suggested connections
        #[arg(long)]
        ai_connections: Option<bool>,
    },

    DeleteWeb {
        web_id: String,
    },

    /// List the webs owned by a user
    Webs {
        #[arg(short, long)]
        user: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    CreateSource {
        name: String,

        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        web: String,

        #[arg(short, long, default_value = "")]
        content: String,

        /// note, website, youtube or any other type
        #[arg(short = 't', long = "type", default_value = "note")]
        source_type: String,

        #[arg(long)]
        url: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    UpdateSource {
        source_id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        content: Option<String>,
    },

    DeleteSource {
        source_id: String,
    },

    /// Semantic search over sources or webs
    Search {
        query: String,

        #[arg(long, default_value = "10")]
        num: usize,

        /// sources or webs
        #[arg(short, long, default_value = "sources")]
        namespace: String,

        /// Restrict matches to one web
        #[arg(short, long)]
        web: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run a read-only Cypher query against the source graph
    Graph {
        cypher: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Connect two sources
    Connect {
        from: String,

        to: String,

        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        web: String,

        #[arg(short, long)]
        label: Option<String>,
    },

    /// List the connections of a source
    Connections {
        source_id: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    Disconnect {
        connection_id: String,
    },
}
