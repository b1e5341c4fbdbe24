use std::collections::HashMap;
use std::io::Write;

use spydr_mcp::{Container, ContainerConfig, Settings};

#[test]
fn test_load_reads_env_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "MONGO_URL=mongodb://localhost:27017\n\
         MONGO_INITDB_DATABASE=spydr_test\n\
         NEO4J_URI=bolt://localhost:7687\n\
         NEO4J_USERNAME=neo4j\n\
         NEO4J_PASSWORD=secret\n\
         PINECONE_API_KEY=key\n\
         PINECONE_INDEX_NAME=spydr-test\n\
         APP_ENV=test"
    )
    .unwrap();

    let settings = Settings::load(Some(file.path())).expect("settings should load");

    if std::env::var("PINECONE_INDEX_NAME").is_err() {
        assert_eq!(settings.pinecone_index_name, "spydr-test");
    }
    if std::env::var("MONGO_INITDB_DATABASE").is_err() {
        assert_eq!(settings.mongo_initdb_database, "spydr_test");
    }
}

#[test]
fn test_environment_overrides_env_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "MONGO_URL=mongodb://file:27017\n\
         MONGO_INITDB_DATABASE=from_file\n\
         NEO4J_URI=bolt://file:7687\n\
         NEO4J_USERNAME=neo4j\n\
         NEO4J_PASSWORD=file-secret\n\
         PINECONE_API_KEY=file-key\n\
         PINECONE_INDEX_NAME=file-index"
    )
    .unwrap();

    let env: HashMap<&str, &str> = [
        ("MONGO_INITDB_DATABASE", "from_env"),
        ("PINECONE_INDEX_NAME", "env-index"),
    ]
    .into_iter()
    .collect();

    let settings = Settings::load_with(Some(file.path()), |key| {
        env.get(key).map(|v| v.to_string())
    })
    .expect("settings should load");

    assert_eq!(settings.mongo_initdb_database, "from_env");
    assert_eq!(settings.pinecone_index_name, "env-index");
    assert_eq!(settings.mongo_url, "mongodb://file:27017");
    assert_eq!(settings.neo4j_uri, "bolt://file:7687");
}

#[tokio::test]
async fn test_memory_container_needs_no_settings() {
    let dir = tempfile::tempdir().unwrap();
    let container = Container::new(ContainerConfig {
        memory_storage: true,
        env_file: Some(dir.path().join("missing.env")),
        ..Default::default()
    })
    .await
    .expect("memory container should not read settings");

    assert!(container.memory_storage());
    container.ping().await.unwrap();
    container.close().await;
}
