pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::{Commands, OutputFormat};

pub use application::{
    AddChatToMemoryUseCase, ConnectSourcesUseCase, CreateSourceUseCase, CreateWebUseCase,
    DeleteSourceUseCase, DeleteWebUseCase, EmbeddingService, GraphContextUseCase,
    GraphRepository, ListWebsUseCase, QueryContextUseCase, UpdateSourceUseCase,
    UpdateWebUseCase, VectorRepository, WebRepository,
};

pub use connector::api::{Container, ContainerConfig, Router, Settings};
pub use connector::{
    InMemoryGraphRepository, InMemoryVectorRepository, InMemoryWebRepository, MockEmbedding,
    MongoWebRepository, Neo4jGraphRepository, PineconeClient,
};

pub use domain::{
    ChatMessage, Connection, ContextQuery, CreateSource, CreateWeb, CreatedSource, DomainError,
    SearchHit, SearchNamespace, Source, SourceType, UpdateSource, UpdateWeb, Visibility, Web,
};
