use anyhow::Result;

use crate::cli::OutputFormat;
use crate::domain::{Connection, Properties};

use super::super::Container;

pub struct GraphController<'a> {
    container: &'a Container,
}

impl<'a> GraphController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn query(&self, cypher: String, format: OutputFormat) -> Result<String> {
        let records = self
            .container
            .graph_context_use_case()
            .execute(&cypher, Properties::new())
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&records)?,
            OutputFormat::Text => self.format_records(&records),
        })
    }

    pub async fn connect(
        &self,
        user_id: String,
        web_id: String,
        from: String,
        to: String,
        label: Option<String>,
    ) -> Result<String> {
        let mut connection = Connection::new(user_id, web_id, from, to)?;
        if let Some(label) = label {
            connection = connection.with_label(label);
        }

        let created = self
            .container
            .connect_sources_use_case()
            .connect(connection)
            .await?;

        Ok(format!(
            "Connected {} -> {} ({})",
            created.from_source_id, created.to_source_id, created.connection_id
        ))
    }

    pub async fn connections(&self, source_id: String, format: OutputFormat) -> Result<String> {
        let connections = self
            .container
            .connect_sources_use_case()
            .connections_of(&source_id)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&connections)?,
            OutputFormat::Text => self.format_connections(&source_id, &connections),
        })
    }

    pub async fn disconnect(&self, connection_id: String) -> Result<String> {
        self.container
            .connect_sources_use_case()
            .disconnect(&connection_id)
            .await?;
        Ok("Connection removed.".to_string())
    }

    fn format_records(&self, records: &[Properties]) -> String {
        if records.is_empty() {
            return "No records.".to_string();
        }

        let mut output = format!("{} record(s):\n\n", records.len());
        for (i, record) in records.iter().enumerate() {
            output.push_str(&format!("{}.\n", i + 1));
            for (key, value) in record {
                output.push_str(&format!("   {}: {}\n", key, value));
            }
        }
        output
    }

    fn format_connections(&self, source_id: &str, connections: &[Connection]) -> String {
        if connections.is_empty() {
            return format!("Source {} has no connections.", source_id);
        }

        let mut output = format!("Connections of {}:\n\n", source_id);
        for connection in connections {
            let (arrow, other) = if connection.from_source_id == source_id {
                ("->", &connection.to_source_id)
            } else {
                ("<-", &connection.from_source_id)
            };
            let label = connection
                .label
                .as_ref()
                .map(|l| format!(" \"{}\"", l))
                .unwrap_or_default();
            output.push_str(&format!(
                "  {} {}{}  ({})\n",
                arrow, other, label, connection.connection_id
            ));
        }
        output
    }
}
