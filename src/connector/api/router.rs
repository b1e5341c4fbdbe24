use anyhow::Result;

use crate::cli::Commands;

use super::container::Container;
use super::controller::{
    GraphController, SearchController, SourceController, StatusController, WebController,
};

pub struct Router<'a> {
    status_controller: StatusController<'a>,
    web_controller: WebController<'a>,
    source_controller: SourceController<'a>,
    search_controller: SearchController<'a>,
    graph_controller: GraphController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            status_controller: StatusController::new(container),
            web_controller: WebController::new(container),
            source_controller: SourceController::new(container),
            search_controller: SearchController::new(container),
            graph_controller: GraphController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ping => self.status_controller.ping().await,
            Commands::CreateWeb {
                name,
                user,
                description,
                visibility,
                tag,
                format,
            } => {
                self.web_controller
                    .create(user, name, description, visibility, tag, format)
                    .await
            }
            Commands::UpdateWeb {
                web_id,
                name,
                description,
                visibility,
                ai_connections,
            } => {
                self.web_controller
                    .update(web_id, name, description, visibility, ai_connections)
                    .await
            }
            Commands::DeleteWeb { web_id } => self.web_controller.delete(web_id).await,
            Commands::Webs { user, format } => self.web_controller.list(user, format).await,
            Commands::CreateSource {
                name,
                user,
                web,
                content,
                source_type,
                url,
                format,
            } => {
                self.source_controller
                    .create(user, web, name, content, source_type, url, format)
                    .await
            }
            Commands::UpdateSource {
                source_id,
                name,
                content,
            } => self.source_controller.update(source_id, name, content).await,
            Commands::DeleteSource { source_id } => self.source_controller.delete(source_id).await,
            Commands::Search {
                query,
                num,
                namespace,
                web,
                format,
            } => {
                self.search_controller
                    .search(query, num, namespace, web, format)
                    .await
            }
            Commands::Graph { cypher, format } => self.graph_controller.query(cypher, format).await,
            Commands::Connect {
                from,
                to,
                user,
                web,
                label,
            } => self.graph_controller.connect(user, web, from, to, label).await,
            Commands::Connections { source_id, format } => {
                self.graph_controller.connections(source_id, format).await
            }
            Commands::Disconnect { connection_id } => {
                self.graph_controller.disconnect(connection_id).await
            }
            Commands::Mcp { .. } => {
                anyhow::bail!("the mcp command is served by the binary, not the router")
            }
        }
    }
}
