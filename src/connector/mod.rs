//! # Connector Layer
//!
//! External integrations implementing the application interfaces:
//! - Document store (MongoDB) for webs
//! - Graph store (Neo4j) for sources and their connections
//! - Vector store (Pinecone) for embeddings and semantic search
//! - MCP transport and the CLI router

pub mod adapter;
pub mod api;

pub use adapter::*;
