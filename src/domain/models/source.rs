use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Every stored character is billed as this many bytes of quota.
pub const SIZE_PER_CHAR: u64 = 200;

/// Kind of content a source holds. Unknown kinds are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceType {
    #[default]
    Note,
    Website,
    Youtube,
    Other(String),
}

impl SourceType {
    pub fn as_str(&self) -> &str {
        match self {
            SourceType::Note => "note",
            SourceType::Website => "website",
            SourceType::Youtube => "youtube",
            SourceType::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "note" => SourceType::Note,
            "website" | "web" => SourceType::Website,
            "youtube" | "video" => SourceType::Youtube,
            _ => SourceType::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for SourceType {
    fn from(s: String) -> Self {
        SourceType::parse(&s)
    }
}

impl From<SourceType> for String {
    fn from(t: SourceType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single piece of content inside a web, stored as a `source` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub source_id: String,
    pub web_id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    // Website metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    // Video metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Source {
    /// Builds a fresh source from a creation payload, assigning a new ID.
    pub fn from_create(payload: CreateSource) -> Self {
        let now = Utc::now();
        let size = content_size(&payload.content);
        Self {
            source_id: Uuid::new_v4().to_string(),
            web_id: payload.web_id,
            user_id: payload.user_id,
            name: payload.name,
            url: payload.url,
            content: Some(payload.content),
            source_type: payload.source_type,
            size,
            created: now,
            updated: now,
            og_image: None,
            og_description: None,
            og_title: None,
            favicon: None,
            description: None,
        }
    }

    /// Flattened property map, as written to the graph store.
    pub fn to_properties(&self) -> Result<serde_json::Map<String, serde_json::Value>, DomainError> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(DomainError::internal("source did not serialize to an object")),
            Err(e) => Err(DomainError::internal(format!("Failed to serialize source: {}", e))),
        }
    }

    pub fn from_properties(
        properties: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, DomainError> {
        serde_json::from_value(serde_json::Value::Object(properties))
            .map_err(|e| DomainError::internal(format!("Malformed source node: {}", e)))
    }
}

pub fn content_size(content: &str) -> u64 {
    content.chars().count() as u64 * SIZE_PER_CHAR
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSource {
    pub user_id: String,
    pub web_id: String,
    pub name: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub url: Option<String>,
}

impl CreateSource {
    pub fn new(
        user_id: impl Into<String>,
        web_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        source_type: SourceType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            web_id: web_id.into(),
            name: name.into(),
            content: content.into(),
            source_type,
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_id.trim().is_empty() {
            return Err(DomainError::invalid_input("user ID is required"));
        }
        if self.web_id.trim().is_empty() {
            return Err(DomainError::invalid_input("web ID is required"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_input("source name is required"));
        }
        Ok(())
    }
}

/// Shorthand payload for a note source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
}

impl CreateNote {
    pub fn into_source(
        self,
        user_id: impl Into<String>,
        web_id: impl Into<String>,
    ) -> CreateSource {
        CreateSource::new(user_id, web_id, self.title, self.content, SourceType::Note)
    }
}

/// Partial update of a source. Changing `content` also recomputes `size`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSource {
    pub name: Option<String>,
    pub content: Option<String>,
}

/// Result of the two-step create-source write.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSource {
    pub source: Source,
    /// Whether the owning web's `sourceIds` now contains the new ID.
    pub web_linked: bool,
    pub webs_modified: u64,
}
