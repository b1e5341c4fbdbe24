mod embedding_service;
mod graph_repository;
mod vector_repository;
mod web_repository;

pub use embedding_service::*;
pub use graph_repository::*;
pub use vector_repository::*;
pub use web_repository::*;
