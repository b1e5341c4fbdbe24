use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::DomainError;

pub const DEFAULT_ENV_FILE: &str = ".env";
const DEFAULT_APP_ENV: &str = "development";

/// Connection settings for the three backing stores plus app secrets.
///
/// | Variable                | Required | Purpose                          |
/// |-------------------------|----------|----------------------------------|
/// | `MONGO_URL`             | yes      | document-store connection string |
/// | `MONGO_INITDB_DATABASE` | yes      | document-store database name     |
/// | `NEO4J_URI`             | yes      | graph-store bolt URI             |
/// | `NEO4J_USERNAME`        | yes      | graph-store user                 |
/// | `NEO4J_PASSWORD`        | yes      | graph-store password             |
/// | `PINECONE_API_KEY`      | yes      | vector-store key                 |
/// | `PINECONE_INDEX_NAME`   | yes      | vector index name                |
/// | `PINECONE_INDEX_HOST`   | no       | skips the index host lookup      |
/// | `PINECONE_API_URL`      | no       | control-plane / inference base   |
/// | `APP_ENV`               | no       | environment name                 |
/// | `APP_SECRET_KEY`        | no       | app secret                       |
/// | `APP_API_URL`           | no       | app API URL                      |
#[derive(Clone)]
pub struct Settings {
    pub mongo_url: String,
    pub mongo_initdb_database: String,
    pub neo4j_uri: String,
    pub neo4j_username: String,
    pub neo4j_password: String,
    pub pinecone_api_key: String,
    pub pinecone_index_name: String,
    pub pinecone_index_host: Option<String>,
    pub pinecone_api_url: Option<String>,
    pub app_env: String,
    pub app_secret_key: Option<String>,
    pub app_api_url: Option<String>,
}

impl Settings {
    /// Reads the process environment, falling back to values from `env_file`
    /// (or `.env` in the working directory when none is given).
    pub fn load(env_file: Option<&Path>) -> Result<Self, DomainError> {
        Self::load_with(env_file, |key| std::env::var(key).ok())
    }

    /// Like [`Settings::load`] with `env` standing in for the process
    /// environment. Values from `env` win over the file.
    pub fn load_with<F>(env_file: Option<&Path>, env: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_values = match env_file {
            Some(path) => read_env_file(path)?,
            None if Path::new(DEFAULT_ENV_FILE).exists() => {
                read_env_file(Path::new(DEFAULT_ENV_FILE))?
            }
            None => HashMap::new(),
        };

        Self::from_lookup(|key| env(key).or_else(|| file_values.get(key).cloned()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| DomainError::config(format!("{} is not set", key)))
        };

        let settings = Self {
            mongo_url: required("MONGO_URL")?,
            mongo_initdb_database: required("MONGO_INITDB_DATABASE")?,
            neo4j_uri: required("NEO4J_URI")?,
            neo4j_username: required("NEO4J_USERNAME")?,
            neo4j_password: required("NEO4J_PASSWORD")?,
            pinecone_api_key: required("PINECONE_API_KEY")?,
            pinecone_index_name: required("PINECONE_INDEX_NAME")?,
            pinecone_index_host: optional("PINECONE_INDEX_HOST"),
            pinecone_api_url: optional("PINECONE_API_URL"),
            app_env: optional("APP_ENV").unwrap_or_else(|| DEFAULT_APP_ENV.to_string()),
            app_secret_key: optional("APP_SECRET_KEY"),
            app_api_url: optional("APP_API_URL"),
        };

        if settings.app_secret_key.is_none() {
            debug!("APP_SECRET_KEY is not set");
        }
        Ok(settings)
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, DomainError> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        DomainError::config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let mut values = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                values.insert(key, value);
            }
            Err(e) => warn!("Skipping malformed line in {}: {}", path.display(), e),
        }
    }
    debug!("Loaded {} values from {}", values.len(), path.display());
    Ok(values)
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("mongo_url", &redact(&self.mongo_url))
            .field("mongo_initdb_database", &self.mongo_initdb_database)
            .field("neo4j_uri", &self.neo4j_uri)
            .field("neo4j_username", &self.neo4j_username)
            .field("neo4j_password", &redact(&self.neo4j_password))
            .field("pinecone_api_key", &redact(&self.pinecone_api_key))
            .field("pinecone_index_name", &self.pinecone_index_name)
            .field("pinecone_index_host", &self.pinecone_index_host)
            .field("pinecone_api_url", &self.pinecone_api_url)
            .field("app_env", &self.app_env)
            .field(
                "app_secret_key",
                &self.app_secret_key.as_deref().map(redact),
            )
            .field("app_api_url", &self.app_api_url)
            .finish()
    }
}
