use anyhow::Result;

use crate::cli::OutputFormat;
use crate::domain::{CreateWeb, UpdateWeb, Visibility, Web};

use super::super::Container;

pub struct WebController<'a> {
    container: &'a Container,
}

impl<'a> WebController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn create(
        &self,
        user_id: String,
        name: String,
        description: String,
        visibility: String,
        tags: Option<Vec<String>>,
        format: OutputFormat,
    ) -> Result<String> {
        let payload = CreateWeb::new(name, description, Visibility::parse(&visibility)?)
            .with_tags(tags.unwrap_or_default());

        let web = self
            .container
            .create_web_use_case()
            .execute(payload, &user_id)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&web)?,
            OutputFormat::Text => format!("Created web {} ({})", web.name, web.web_id),
        })
    }

    pub async fn update(
        &self,
        web_id: String,
        name: Option<String>,
        description: Option<String>,
        visibility: Option<String>,
        enable_ai_connections: Option<bool>,
    ) -> Result<String> {
        let update = UpdateWeb {
            name,
            description,
            visibility: visibility.as_deref().map(Visibility::parse).transpose()?,
            enable_ai_connections,
        };

        let web = self
            .container
            .update_web_use_case()
            .execute(&web_id, update)
            .await?;

        Ok(format!("Updated web {} ({})", web.name, web.web_id))
    }

    pub async fn delete(&self, web_id: String) -> Result<String> {
        self.container.delete_web_use_case().execute(&web_id).await?;
        Ok("Web deleted successfully.".to_string())
    }

    pub async fn list(&self, user_id: String, format: OutputFormat) -> Result<String> {
        let webs = self.container.list_webs_use_case().execute(&user_id).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&webs)?,
            OutputFormat::Text => self.format_webs(&webs),
        })
    }

    fn format_webs(&self, webs: &[Web]) -> String {
        if webs.is_empty() {
            return "No webs found.".to_string();
        }

        let mut output = String::from("Webs:\n\n");
        for web in webs {
            output.push_str(&format!("  {} ({})\n", web.name, web.web_id));
            if !web.description.is_empty() {
                output.push_str(&format!("    {}\n", web.description));
            }
            output.push_str(&format!(
                "    Visibility: {}, Sources: {}\n",
                web.visibility,
                web.source_ids.len()
            ));
            if !web.tags.is_empty() {
                output.push_str(&format!("    Tags: {}\n", web.tags.join(", ")));
            }
            output.push('\n');
        }
        output
    }
}
