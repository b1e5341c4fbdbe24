use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::{GraphRepository, WebRepository};
use crate::domain::{CreateSource, CreatedSource, DomainError, Source, SOURCE_LABEL};

/// Creates a source node in the graph store and links it to its web.
///
/// The two writes are not transactional. A failed graph write aborts; a
/// failed web update leaves the node in place and is reported through
/// [`CreatedSource::web_linked`].
pub struct CreateSourceUseCase {
    graph_repo: Arc<dyn GraphRepository>,
    web_repo: Arc<dyn WebRepository>,
}

impl CreateSourceUseCase {
    pub fn new(graph_repo: Arc<dyn GraphRepository>, web_repo: Arc<dyn WebRepository>) -> Self {
        Self {
            graph_repo,
            web_repo,
        }
    }

    pub async fn execute(&self, payload: CreateSource) -> Result<CreatedSource, DomainError> {
        payload.validate()?;

        let source = Source::from_create(payload);
        debug!("Source ID: {}", source.source_id);

        let stored = self
            .graph_repo
            .create_node(SOURCE_LABEL, source.to_properties()?)
            .await
            .map_err(|e| {
                error!("Failed to create source {} in graph: {}", source.source_id, e);
                e
            })?;
        let source = match Source::from_properties(stored) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(
                    "Could not decode stored source {}, using request values: {}",
                    source.source_id, e
                );
                source
            }
        };
        info!(
            "Created source {} ({}) in graph for web {}",
            source.source_id, source.source_type, source.web_id
        );

        let (web_linked, webs_modified) = match self
            .web_repo
            .add_source_id(&source.web_id, &source.source_id)
            .await
        {
            Ok(0) => {
                warn!(
                    "Web {} was not modified while linking source {}",
                    source.web_id, source.source_id
                );
                (false, 0)
            }
            Ok(modified) => {
                debug!("Webs modified: {}", modified);
                (true, modified)
            }
            Err(e) => {
                error!(
                    "Source {} created in graph but web {} was not updated: {}",
                    source.source_id, source.web_id, e
                );
                (false, 0)
            }
        };

        Ok(CreatedSource {
            source,
            web_linked,
            webs_modified,
        })
    }
}
