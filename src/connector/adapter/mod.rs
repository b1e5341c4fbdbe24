mod in_memory_graph_repository;
mod in_memory_vector_repository;
mod in_memory_web_repository;
pub mod mcp;
mod mock_embedding;
mod mongo_web_repository;
mod neo4j_graph_repository;
mod pinecone_client;

pub use in_memory_graph_repository::*;
pub use in_memory_vector_repository::*;
pub use in_memory_web_repository::*;
pub use mock_embedding::*;
pub use mongo_web_repository::*;
pub use neo4j_graph_repository::*;
pub use pinecone_client::*;
