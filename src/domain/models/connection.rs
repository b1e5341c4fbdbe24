use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// A `connection` relationship between two source nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: String,
    pub from_source_id: String,
    pub to_source_id: String,
    pub user_id: String,
    pub web_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub created: DateTime<Utc>,
}

impl Connection {
    pub fn new(
        user_id: impl Into<String>,
        web_id: impl Into<String>,
        from_source_id: impl Into<String>,
        to_source_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let from_source_id = from_source_id.into();
        let to_source_id = to_source_id.into();

        if from_source_id.trim().is_empty() || to_source_id.trim().is_empty() {
            return Err(DomainError::invalid_input(
                "both source IDs are required to connect sources",
            ));
        }
        if from_source_id == to_source_id {
            return Err(DomainError::invalid_input(format!(
                "source {} cannot be connected to itself",
                from_source_id
            )));
        }

        Ok(Self {
            connection_id: Uuid::new_v4().to_string(),
            from_source_id,
            to_source_id,
            user_id: user_id.into(),
            web_id: web_id.into(),
            label: None,
            created: Utc::now(),
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.trim().is_empty() {
            self.label = Some(label);
        }
        self
    }

    /// Relationship properties, excluding the endpoint IDs (those are the nodes).
    pub fn relationship_properties(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("connectionId".into(), self.connection_id.clone().into());
        map.insert("userId".into(), self.user_id.clone().into());
        map.insert("webId".into(), self.web_id.clone().into());
        map.insert("created".into(), self.created.to_rfc3339().into());
        if let Some(label) = &self.label {
            map.insert("label".into(), label.clone().into());
        }
        map
    }

    pub fn involves(&self, source_id: &str) -> bool {
        self.from_source_id == source_id || self.to_source_id == source_id
    }
}
