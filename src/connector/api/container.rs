use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::application::{
    AddChatToMemoryUseCase, ConnectSourcesUseCase, CreateSourceUseCase, CreateWebUseCase,
    DeleteSourceUseCase, DeleteWebUseCase, EmbeddingService, GraphContextUseCase,
    GraphRepository, ListWebsUseCase, QueryContextUseCase, UpdateSourceUseCase,
    UpdateWebUseCase, VectorRepository, WebRepository,
};
use crate::connector::adapter::{
    InMemoryGraphRepository, InMemoryVectorRepository, InMemoryWebRepository, MockEmbedding,
    MongoWebRepository, Neo4jGraphRepository, PineconeClient,
};

use super::settings::Settings;

pub struct ContainerConfig {
    /// Use process-local stores and mock embeddings instead of the real backends.
    pub memory_storage: bool,
    /// Let `get_graph_context` run write statements.
    pub allow_graph_writes: bool,
    pub env_file: Option<PathBuf>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            memory_storage: false,
            allow_graph_writes: false,
            env_file: None,
        }
    }
}

/// Holds one client per backing store, opened at startup and shared by every use case.
pub struct Container {
    web_repo: Arc<dyn WebRepository>,
    graph_repo: Arc<dyn GraphRepository>,
    vector_repo: Arc<dyn VectorRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        if config.memory_storage {
            debug!("Using in-memory stores and mock embeddings");
            let vector = Arc::new(InMemoryVectorRepository::new());
            return Ok(Self {
                web_repo: Arc::new(InMemoryWebRepository::new()),
                graph_repo: Arc::new(InMemoryGraphRepository::new()),
                vector_repo: vector,
                embedding_service: Arc::new(MockEmbedding::new()),
                config,
            });
        }

        let settings = Settings::load(config.env_file.as_deref())?;
        debug!("Loaded settings: {:?}", settings);
        info!("Starting in {} environment", settings.app_env);

        let mongo = MongoWebRepository::connect(
            &settings.mongo_url,
            &settings.mongo_initdb_database,
        )
        .await?;
        mongo.ping().await?;
        info!("Connected to MongoDB database {}", settings.mongo_initdb_database);

        let neo4j = Neo4jGraphRepository::connect(
            &settings.neo4j_uri,
            &settings.neo4j_username,
            &settings.neo4j_password,
        )
        .await?;
        neo4j.verify_connectivity().await?;
        info!("Connected to Neo4j at {}", settings.neo4j_uri);

        let pinecone = Arc::new(
            PineconeClient::connect(
                settings.pinecone_api_key.clone(),
                settings.pinecone_index_name.clone(),
                settings.pinecone_api_url.as_deref(),
                settings.pinecone_index_host.as_deref(),
            )
            .await?,
        );
        info!("Connected to Pinecone index {}", pinecone.index_name());

        Ok(Self {
            web_repo: Arc::new(mongo),
            graph_repo: Arc::new(neo4j),
            vector_repo: pinecone.clone(),
            embedding_service: pinecone,
            config,
        })
    }

    /// Builds a container over caller-supplied stores.
    pub fn from_parts(
        web_repo: Arc<dyn WebRepository>,
        graph_repo: Arc<dyn GraphRepository>,
        vector_repo: Arc<dyn VectorRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            web_repo,
            graph_repo,
            vector_repo,
            embedding_service,
            config,
        }
    }

    pub fn create_source_use_case(&self) -> CreateSourceUseCase {
        CreateSourceUseCase::new(self.graph_repo.clone(), self.web_repo.clone())
    }

    pub fn update_source_use_case(&self) -> UpdateSourceUseCase {
        UpdateSourceUseCase::new(self.graph_repo.clone())
    }

    pub fn delete_source_use_case(&self) -> DeleteSourceUseCase {
        DeleteSourceUseCase::new(self.graph_repo.clone(), self.web_repo.clone())
    }

    pub fn add_chat_to_memory_use_case(&self) -> AddChatToMemoryUseCase {
        AddChatToMemoryUseCase::new(self.create_source_use_case())
    }

    pub fn create_web_use_case(&self) -> CreateWebUseCase {
        CreateWebUseCase::new(self.web_repo.clone())
    }

    pub fn update_web_use_case(&self) -> UpdateWebUseCase {
        UpdateWebUseCase::new(self.web_repo.clone())
    }

    pub fn delete_web_use_case(&self) -> DeleteWebUseCase {
        DeleteWebUseCase::new(self.web_repo.clone())
    }

    pub fn list_webs_use_case(&self) -> ListWebsUseCase {
        ListWebsUseCase::new(self.web_repo.clone())
    }

    pub fn query_context_use_case(&self) -> QueryContextUseCase {
        QueryContextUseCase::new(self.vector_repo.clone(), self.embedding_service.clone())
    }

    pub fn graph_context_use_case(&self) -> GraphContextUseCase {
        GraphContextUseCase::new(self.graph_repo.clone())
            .with_writes_allowed(self.config.allow_graph_writes)
    }

    pub fn connect_sources_use_case(&self) -> ConnectSourcesUseCase {
        ConnectSourcesUseCase::new(self.graph_repo.clone())
    }

    /// Round-trips each store; used by the `ping` command.
    pub async fn ping(&self) -> Result<()> {
        self.web_repo.ping().await?;
        self.graph_repo.verify_connectivity().await?;
        Ok(())
    }

    pub fn memory_storage(&self) -> bool {
        self.config.memory_storage
    }

    pub fn embedding_model(&self) -> &str {
        self.embedding_service.model_name()
    }

    pub async fn close(&self) {
        self.web_repo.close().await;
        self.graph_repo.close().await;
        info!("Closed store connections");
    }
}
