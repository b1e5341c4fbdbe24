use anyhow::Result;

use crate::cli::OutputFormat;
use crate::domain::{ContextQuery, SearchHit, SearchNamespace};

use super::super::Container;

const PREVIEW_LINES: usize = 3;

pub struct SearchController<'a> {
    container: &'a Container,
}

impl<'a> SearchController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn search(
        &self,
        query: String,
        num: usize,
        namespace: String,
        web_id: Option<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let namespace = SearchNamespace::parse(&namespace)?;
        let mut context_query = ContextQuery::new(&query)
            .with_top_k(num)
            .with_namespace(namespace);

        if let Some(web_id) = web_id {
            context_query = context_query.with_metadata_eq("webId", web_id);
        }

        let use_case = self.container.query_context_use_case();
        let hits = use_case.execute(context_query).await?;

        Ok(match format {
            OutputFormat::Json => {
                let flat: Vec<serde_json::Value> =
                    hits.into_iter().map(SearchHit::into_flat_json).collect();
                serde_json::to_string_pretty(&flat)?
            }
            OutputFormat::Text => self.format_search_results(namespace, &hits),
        })
    }

    fn format_search_results(&self, namespace: SearchNamespace, hits: &[SearchHit]) -> String {
        if hits.is_empty() {
            return "No results found.".to_string();
        }

        let mut output = format!("Found {} results in {}:\n\n", hits.len(), namespace);

        for (i, hit) in hits.iter().enumerate() {
            let name = hit
                .metadata()
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("(unnamed)");
            output.push_str(&format!(
                "{}. {} [{}] (score: {:.3})\n",
                i + 1,
                name,
                hit.id(),
                hit.score()
            ));

            if let Some(text) = hit
                .metadata()
                .get("content")
                .or_else(|| hit.metadata().get("description"))
                .and_then(|v| v.as_str())
            {
                let preview: String = text
                    .lines()
                    .take(PREVIEW_LINES)
                    .map(|l| format!("   | {}", l))
                    .collect::<Vec<_>>()
                    .join("\n");
                output.push_str(&preview);
                output.push('\n');
            }
            output.push('\n');
        }

        output
    }
}
