//! Pure helpers shared by the graph adapters and use cases.

mod cypher;

pub use cypher::*;
