use anyhow::Result;

use super::super::Container;

pub struct StatusController<'a> {
    container: &'a Container,
}

impl<'a> StatusController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ping(&self) -> Result<String> {
        self.container.ping().await?;

        let storage = if self.container.memory_storage() {
            "in-memory"
        } else {
            "MongoDB + Neo4j + Pinecone"
        };
        Ok(format!(
            "Stores reachable.\nStorage:   {}\nEmbedding: {}",
            storage,
            self.container.embedding_model()
        ))
    }
}
