use async_trait::async_trait;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::WebRepository;
use crate::domain::{DomainError, UpdateWeb, Visibility, Web};

pub const WEBS_COLLECTION: &str = "webs";

/// Stored shape of a web. Timestamps are native BSON dates, as the
/// other writers of the `webs` collection store them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebDocument {
    web_id: String,
    user_id: String,
    name: String,
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    source_ids: Vec<String>,
    #[serde(default)]
    image_keys: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    updated: DateTime<Utc>,
    visibility: Visibility,
    #[serde(default)]
    likes: Vec<String>,
    #[serde(default)]
    iterated_from: Option<String>,
    #[serde(default)]
    iterations: Vec<String>,
    #[serde(rename = "enableAIConnections", default = "default_true")]
    enable_ai_connections: bool,
    #[serde(default)]
    showcase: bool,
}

fn default_true() -> bool {
    true
}

impl From<&Web> for WebDocument {
    fn from(web: &Web) -> Self {
        let web = web.clone();
        Self {
            web_id: web.web_id,
            user_id: web.user_id,
            name: web.name,
            description: web.description,
            tags: web.tags,
            source_ids: web.source_ids,
            image_keys: web.image_keys,
            created: web.created,
            updated: web.updated,
            visibility: web.visibility,
            likes: web.likes,
            iterated_from: web.iterated_from,
            iterations: web.iterations,
            enable_ai_connections: web.enable_ai_connections,
            showcase: web.showcase,
        }
    }
}

impl From<WebDocument> for Web {
    fn from(doc: WebDocument) -> Self {
        Self {
            web_id: doc.web_id,
            user_id: doc.user_id,
            name: doc.name,
            description: doc.description,
            tags: doc.tags,
            source_ids: doc.source_ids,
            image_keys: doc.image_keys,
            created: doc.created,
            updated: doc.updated,
            visibility: doc.visibility,
            likes: doc.likes,
            iterated_from: doc.iterated_from,
            iterations: doc.iterations,
            enable_ai_connections: doc.enable_ai_connections,
            showcase: doc.showcase,
        }
    }
}

/// `webs` collection in MongoDB. Documents are keyed by `webId`.
pub struct MongoWebRepository {
    client: Client,
    db: Database,
    webs: Collection<WebDocument>,
}

impl MongoWebRepository {
    pub async fn connect(url: &str, database: &str) -> Result<Self, DomainError> {
        let mut options = ClientOptions::parse(url)
            .await
            .map_err(|e| DomainError::config(format!("Invalid MongoDB URL: {}", e)))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)
            .map_err(|e| DomainError::storage(format!("Failed to create MongoDB client: {}", e)))?;
        let db = client.database(database);
        let webs = db.collection::<WebDocument>(WEBS_COLLECTION);

        debug!("Using MongoDB database {}", database);

        Ok(Self { client, db, webs })
    }
}

fn storage_err(action: &str, e: mongodb::error::Error) -> DomainError {
    DomainError::storage(format!("Failed to {}: {}", action, e))
}

fn update_document(update: &UpdateWeb) -> Document {
    let mut set = Document::new();
    if let Some(name) = &update.name {
        set.insert("name", name.as_str());
    }
    if let Some(description) = &update.description {
        set.insert("description", description.as_str());
    }
    if let Some(visibility) = update.visibility {
        set.insert("visibility", visibility.as_str());
    }
    if let Some(enabled) = update.enable_ai_connections {
        set.insert("enableAIConnections", enabled);
    }
    set.insert("updated", bson::DateTime::from_chrono(Utc::now()));
    doc! { "$set": set }
}

#[async_trait]
impl WebRepository for MongoWebRepository {
    async fn ping(&self) -> Result<(), DomainError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| storage_err("ping MongoDB", e))?;
        Ok(())
    }

    async fn insert(&self, web: &Web) -> Result<(), DomainError> {
        self.webs
            .insert_one(WebDocument::from(web))
            .await
            .map_err(|e| storage_err("insert web", e))?;
        debug!("Inserted web {}", web.web_id);
        Ok(())
    }

    async fn find_by_id(&self, web_id: &str) -> Result<Option<Web>, DomainError> {
        let found = self
            .webs
            .find_one(doc! { "webId": web_id })
            .await
            .map_err(|e| storage_err("find web", e))?;
        Ok(found.map(Web::from))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Web>, DomainError> {
        let docs: Vec<WebDocument> = self
            .webs
            .find(doc! { "userId": user_id })
            .sort(doc! { "created": 1 })
            .await
            .map_err(|e| storage_err("list webs", e))?
            .try_collect()
            .await
            .map_err(|e| storage_err("read webs", e))?;
        Ok(docs.into_iter().map(Web::from).collect())
    }

    async fn update(&self, web_id: &str, update: &UpdateWeb) -> Result<Option<Web>, DomainError> {
        let updated = self
            .webs
            .find_one_and_update(doc! { "webId": web_id }, update_document(update))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| storage_err("update web", e))?;
        Ok(updated.map(Web::from))
    }

    async fn add_source_id(&self, web_id: &str, source_id: &str) -> Result<u64, DomainError> {
        let result = self
            .webs
            .update_one(
                doc! { "webId": web_id },
                doc! { "$addToSet": { "sourceIds": source_id } },
            )
            .await
            .map_err(|e| storage_err("add source to web", e))?;
        debug!(
            "add_source_id matched {} modified {}",
            result.matched_count, result.modified_count
        );
        Ok(result.modified_count)
    }

    async fn remove_source_id(&self, web_id: &str, source_id: &str) -> Result<u64, DomainError> {
        let result = self
            .webs
            .update_one(
                doc! { "webId": web_id },
                doc! { "$pull": { "sourceIds": source_id } },
            )
            .await
            .map_err(|e| storage_err("remove source from web", e))?;
        Ok(result.modified_count)
    }

    async fn delete(&self, web_id: &str) -> Result<bool, DomainError> {
        let result = self
            .webs
            .delete_one(doc! { "webId": web_id })
            .await
            .map_err(|e| storage_err("delete web", e))?;
        Ok(result.deleted_count > 0)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        debug!("MongoDB client shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Visibility;

    #[test]
    fn test_update_document_sets_only_given_fields() {
        let update = UpdateWeb {
            name: Some("Renamed".to_string()),
            visibility: Some(Visibility::Public),
            ..Default::default()
        };
        let doc = update_document(&update);
        let set = doc.get_document("$set").unwrap();

        assert_eq!(set.get_str("name").unwrap(), "Renamed");
        assert_eq!(set.get_str("visibility").unwrap(), "Public");
        assert!(set.get("description").is_none());
        assert!(set.get("enableAIConnections").is_none());
        assert!(set.get_datetime("updated").is_ok());
    }

    #[test]
    fn test_web_document_reads_bson_dates() {
        let stored = doc! {
            "webId": "w1",
            "userId": "u1",
            "name": "Reading",
            "description": "",
            "created": bson::DateTime::now(),
            "updated": bson::DateTime::now(),
            "visibility": "Public",
        };

        let web = Web::from(bson::from_document::<WebDocument>(stored).unwrap());

        assert_eq!(web.web_id, "w1");
        assert!(web.is_public());
        assert!(web.enable_ai_connections);
        assert!(web.source_ids.is_empty());
    }

    #[test]
    fn test_web_document_writes_bson_dates() {
        let web = Web::create(
            crate::domain::CreateWeb::new("Reading", "", Visibility::Private),
            "u1",
        );

        let encoded = bson::to_document(&WebDocument::from(&web)).unwrap();

        assert!(encoded.get_datetime("created").is_ok());
        assert!(encoded.get_datetime("updated").is_ok());
        assert_eq!(encoded.get_str("webId").unwrap(), web.web_id);
    }
}
