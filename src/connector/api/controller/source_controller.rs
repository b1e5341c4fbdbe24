use anyhow::Result;

use crate::cli::OutputFormat;
use crate::domain::{CreateSource, CreatedSource, SourceType, UpdateSource};

use super::super::Container;

pub struct SourceController<'a> {
    container: &'a Container,
}

impl<'a> SourceController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: String,
        web_id: String,
        name: String,
        content: String,
        source_type: String,
        url: Option<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let mut payload = CreateSource::new(
            user_id,
            web_id,
            name,
            content,
            SourceType::parse(&source_type),
        );
        if let Some(url) = url {
            payload = payload.with_url(url);
        }

        let created = self.container.create_source_use_case().execute(payload).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&created)?,
            OutputFormat::Text => self.format_created(&created),
        })
    }

    pub async fn update(
        &self,
        source_id: String,
        name: Option<String>,
        content: Option<String>,
    ) -> Result<String> {
        let source = self
            .container
            .update_source_use_case()
            .execute(&source_id, UpdateSource { name, content })
            .await?;

        Ok(format!(
            "Updated source {} ({}, size {})",
            source.name, source.source_id, source.size
        ))
    }

    pub async fn delete(&self, source_id: String) -> Result<String> {
        self.container
            .delete_source_use_case()
            .execute(&source_id)
            .await?;
        Ok("Source deleted successfully.".to_string())
    }

    fn format_created(&self, created: &CreatedSource) -> String {
        let source = &created.source;
        let mut output = format!(
            "Created {} source {} ({})\n",
            source.source_type, source.name, source.source_id
        );
        if created.web_linked {
            output.push_str(&format!("Linked to web {}", source.web_id));
        } else {
            output.push_str(&format!(
                "Warning: source was not added to web {}",
                source.web_id
            ));
        }
        output
    }
}
