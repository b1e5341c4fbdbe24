use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Who may see a web.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Private,
    Public,
    Invite,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "Private",
            Visibility::Public => "Public",
            Visibility::Invite => "Invite",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            "invite" => Ok(Visibility::Invite),
            _ => Err(DomainError::invalid_input(format!(
                "invalid visibility '{}' (expected Private, Public or Invite)",
                s
            ))),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// A user-owned collection of sources, stored in the `webs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Web {
    pub web_id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source_ids: Vec<String>,
    #[serde(default)]
    pub image_keys: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub visibility: Visibility,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub iterated_from: Option<String>,
    #[serde(default)]
    pub iterations: Vec<String>,
    #[serde(rename = "enableAIConnections", default = "default_true")]
    pub enable_ai_connections: bool,
    #[serde(default)]
    pub showcase: bool,
}

impl Web {
    /// Builds a new web owned by `user_id`, assigning a fresh ID.
    pub fn create(payload: CreateWeb, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            web_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: payload.name,
            description: payload.description,
            tags: payload.tags,
            source_ids: payload.source_ids,
            image_keys: payload.image_keys,
            created: now,
            updated: now,
            visibility: payload.visibility,
            likes: Vec::new(),
            iterated_from: None,
            iterations: Vec::new(),
            enable_ai_connections: payload.enable_ai_connections,
            showcase: payload.showcase,
        }
    }

    pub fn contains_source(&self, source_id: &str) -> bool {
        self.source_ids.iter().any(|id| id == source_id)
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Applies the set fields of `update` and bumps `updated`.
    pub fn apply(&mut self, update: &UpdateWeb) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(visibility) = update.visibility {
            self.visibility = visibility;
        }
        if let Some(enabled) = update.enable_ai_connections {
            self.enable_ai_connections = enabled;
        }
        self.updated = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWeb {
    pub name: String,
    pub description: String,
    pub visibility: Visibility,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source_ids: Vec<String>,
    #[serde(default)]
    pub image_keys: Vec<String>,
    #[serde(rename = "enableAIConnections", default = "default_true")]
    pub enable_ai_connections: bool,
    #[serde(default)]
    pub showcase: bool,
}

impl CreateWeb {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            visibility,
            tags: Vec::new(),
            source_ids: Vec::new(),
            image_keys: Vec::new(),
            enable_ai_connections: true,
            showcase: false,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_input("web name is required"));
        }
        Ok(())
    }
}

/// Partial update of a web. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWeb {
    pub name: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    #[serde(rename = "enableAIConnections")]
    pub enable_ai_connections: Option<bool>,
}

impl UpdateWeb {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.visibility.is_none()
            && self.enable_ai_connections.is_none()
    }
}
