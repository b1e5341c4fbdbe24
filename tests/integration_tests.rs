//! Integration tests for spydr-mcp.
//!
//! These run the use cases end to end against the in-memory stores.

use std::sync::Arc;

use serde_json::json;

use spydr_mcp::{
    AddChatToMemoryUseCase, ChatMessage, Connection, ConnectSourcesUseCase, ContextQuery,
    CreateSource, CreateSourceUseCase, CreateWeb, CreateWebUseCase, DeleteSourceUseCase,
    DeleteWebUseCase, DomainError, GraphContextUseCase, GraphRepository, InMemoryGraphRepository,
    InMemoryVectorRepository, InMemoryWebRepository, MockEmbedding, QueryContextUseCase,
    SearchNamespace, SourceType, UpdateSource, UpdateSourceUseCase, UpdateWeb, UpdateWebUseCase,
    Visibility, Web, WebRepository,
};

struct TestEnv {
    web_repo: Arc<InMemoryWebRepository>,
    graph_repo: Arc<InMemoryGraphRepository>,
    vector_repo: Arc<InMemoryVectorRepository>,
    embedding: Arc<MockEmbedding>,
}

fn setup_test_env() -> TestEnv {
    TestEnv {
        web_repo: Arc::new(InMemoryWebRepository::new()),
        graph_repo: Arc::new(InMemoryGraphRepository::new()),
        vector_repo: Arc::new(InMemoryVectorRepository::new()),
        embedding: Arc::new(MockEmbedding::with_dimensions(64)),
    }
}

impl TestEnv {
    fn create_source(&self) -> CreateSourceUseCase {
        CreateSourceUseCase::new(self.graph_repo.clone(), self.web_repo.clone())
    }

    async fn create_web(&self, user_id: &str) -> Web {
        CreateWebUseCase::new(self.web_repo.clone())
            .execute(CreateWeb::new("Research", "", Visibility::Private), user_id)
            .await
            .expect("Failed to create web")
    }
}

#[tokio::test]
async fn test_create_source_links_web() {
    let env = setup_test_env();
    let web = env.create_web("user-1").await;

    let created = env
        .create_source()
        .execute(CreateSource::new(
            "user-1",
            &web.web_id,
            "Paper",
            "four",
            SourceType::Website,
        ))
        .await
        .expect("Failed to create source");

    assert!(created.web_linked);
    assert_eq!(created.webs_modified, 1);
    assert_eq!(created.source.size, 4 * 200);

    let stored = env.web_repo.find_by_id(&web.web_id).await.unwrap().unwrap();
    assert_eq!(stored.source_ids, vec![created.source.source_id.clone()]);

    let node = env
        .graph_repo
        .find_node("source", "sourceId", &created.source.source_id)
        .await
        .unwrap()
        .expect("source node should exist");
    assert_eq!(node["type"], "website");
    assert_eq!(node["webId"], json!(web.web_id));
}

#[tokio::test]
async fn test_update_web_applies_given_fields() {
    let env = setup_test_env();
    let web = env.create_web("user-1").await;
    let use_case = UpdateWebUseCase::new(env.web_repo.clone());

    let updated = use_case
        .execute(
            &web.web_id,
            UpdateWeb {
                name: Some("Renamed".to_string()),
                visibility: Some(Visibility::Invite),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update web");

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.visibility, Visibility::Invite);
    assert_eq!(updated.description, web.description);
    assert!(updated.updated >= web.updated);

    let stored = env.web_repo.find_by_id(&web.web_id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Renamed");
}

#[tokio::test]
async fn test_update_web_rejects_bad_requests() {
    let env = setup_test_env();
    let web = env.create_web("user-1").await;
    let use_case = UpdateWebUseCase::new(env.web_repo.clone());

    let err = use_case
        .execute(&web.web_id, UpdateWeb::default())
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());

    let blank = UpdateWeb {
        name: Some("   ".to_string()),
        ..Default::default()
    };
    let err = use_case.execute(&web.web_id, blank).await.unwrap_err();
    assert!(err.is_invalid_input());

    let rename = UpdateWeb {
        name: Some("Elsewhere".to_string()),
        ..Default::default()
    };
    let err = use_case.execute("no-such-web", rename).await.unwrap_err();
    assert!(err.is_not_found());

    let stored = env.web_repo.find_by_id(&web.web_id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Research");
}

#[tokio::test]
async fn test_delete_web() {
    let env = setup_test_env();
    let web = env.create_web("user-1").await;
    let use_case = DeleteWebUseCase::new(env.web_repo.clone());

    use_case.execute(&web.web_id).await.expect("Failed to delete web");
    assert!(env.web_repo.find_by_id(&web.web_id).await.unwrap().is_none());

    let err = use_case.execute(&web.web_id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_source_for_missing_web_keeps_node() {
    let env = setup_test_env();

    let created = env
        .create_source()
        .execute(CreateSource::new(
            "user-1",
            "no-such-web",
            "Orphan",
            "text",
            SourceType::Note,
        ))
        .await
        .expect("graph write should still succeed");

    assert!(!created.web_linked);
    assert_eq!(created.webs_modified, 0);
    assert_eq!(env.graph_repo.node_count("source").await, 1);
}

#[tokio::test]
async fn test_create_source_rejects_blank_name() {
    let env = setup_test_env();
    let err = env
        .create_source()
        .execute(CreateSource::new("u", "w", "  ", "x", SourceType::Note))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert_eq!(env.graph_repo.node_count("source").await, 0);
}

#[tokio::test]
async fn test_add_chat_to_memory_stores_note() {
    let env = setup_test_env();
    let web = env.create_web("user-1").await;
    let use_case = AddChatToMemoryUseCase::new(env.create_source());

    let created = use_case
        .execute(
            "user-1",
            &web.web_id,
            vec![
                ChatMessage::new("user", "What is a web?"),
                ChatMessage::new("assistant", "A collection of sources."),
            ],
            Some("Webs explained\nShort Q&A".to_string()),
        )
        .await
        .expect("Failed to remember chat");

    assert_eq!(created.source.name, "Webs explained");
    assert_eq!(created.source.source_type, SourceType::Note);
    let content = created.source.content.unwrap();
    assert!(content.contains("user: What is a web?"));
    assert!(content.contains("assistant: A collection of sources."));
    assert!(created.web_linked);
}

#[tokio::test]
async fn test_add_chat_to_memory_rejects_empty_chat() {
    let env = setup_test_env();
    let use_case = AddChatToMemoryUseCase::new(env.create_source());

    let err = use_case
        .execute("user-1", "web-1", Vec::new(), None)
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_update_and_delete_source() {
    let env = setup_test_env();
    let web = env.create_web("user-1").await;
    let created = env
        .create_source()
        .execute(CreateSource::new("user-1", &web.web_id, "Draft", "a", SourceType::Note))
        .await
        .unwrap();
    let source_id = created.source.source_id;

    let updated = UpdateSourceUseCase::new(env.graph_repo.clone())
        .execute(
            &source_id,
            UpdateSource {
                name: Some("Final".to_string()),
                content: Some("abcd".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Final");
    assert_eq!(updated.size, 4 * 200);

    DeleteSourceUseCase::new(env.graph_repo.clone(), env.web_repo.clone())
        .execute(&source_id)
        .await
        .unwrap();

    assert_eq!(env.graph_repo.node_count("source").await, 0);
    let stored = env.web_repo.find_by_id(&web.web_id).await.unwrap().unwrap();
    assert!(stored.source_ids.is_empty());
}

#[tokio::test]
async fn test_query_context_searches_requested_namespace() {
    let env = setup_test_env();
    let meta = |name: &str, web: &str| {
        json!({"name": name, "webId": web})
            .as_object()
            .cloned()
            .unwrap()
    };

    for (id, text, web) in [
        ("s1", "rust ownership", "w1"),
        ("s2", "graph databases", "w1"),
        ("s3", "rust ownership", "w2"),
    ] {
        env.vector_repo
            .upsert(
                SearchNamespace::Sources,
                id,
                env.embedding.generate_embedding(text),
                meta(text, web),
            )
            .await;
    }
    env.vector_repo
        .upsert(
            SearchNamespace::Webs,
            "w1",
            env.embedding.generate_embedding("rust ownership"),
            meta("Web one", "w1"),
        )
        .await;

    let use_case = QueryContextUseCase::new(env.vector_repo.clone(), env.embedding.clone());

    let hits = use_case
        .run_semantic_source_search("rust ownership", Some("w1"), 5)
        .await
        .unwrap();
    assert_eq!(hits[0].id(), "s1");
    assert!(hits.iter().all(|h| h.metadata()["webId"] == "w1"));

    let webs = use_case
        .run_semantic_web_search("rust ownership", 5)
        .await
        .unwrap();
    assert_eq!(webs.len(), 1);
    assert_eq!(webs[0].id(), "w1");

    let one = use_case
        .execute(ContextQuery::new("rust ownership").with_top_k(1))
        .await
        .unwrap();
    assert_eq!(one.len(), 1);
}

#[tokio::test]
async fn test_query_context_rejects_empty_query() {
    let env = setup_test_env();
    let use_case = QueryContextUseCase::new(env.vector_repo.clone(), env.embedding.clone());

    let err = use_case.execute(ContextQuery::new("   ")).await.unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_graph_context_guards_writes() {
    let env = setup_test_env();
    let use_case = GraphContextUseCase::new(env.graph_repo.clone());

    let err = use_case
        .execute("MATCH (s:source) SET s.name = 'x'", Default::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("read-only"));

    for cypher in [
        "CALL apoc.cypher.runWrite('MATCH (n) DETACH DELETE n', {}) YIELD value RETURN value",
        "CALL db.createLabel('pwned')",
    ] {
        let err = use_case.execute(cypher, Default::default()).await.unwrap_err();
        assert!(err.to_string().contains("read-only"), "{} was let through", cypher);
    }

    let err = use_case.execute("  ", Default::default()).await.unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_connect_sources_round_trip() {
    let env = setup_test_env();
    let web = env.create_web("user-1").await;
    let a = env
        .create_source()
        .execute(CreateSource::new("user-1", &web.web_id, "A", "a", SourceType::Note))
        .await
        .unwrap()
        .source;
    let b = env
        .create_source()
        .execute(CreateSource::new("user-1", &web.web_id, "B", "b", SourceType::Note))
        .await
        .unwrap()
        .source;

    let use_case = ConnectSourcesUseCase::new(env.graph_repo.clone());
    let connection = Connection::new("user-1", &web.web_id, &a.source_id, &b.source_id)
        .unwrap()
        .with_label("cites");
    let created = use_case.connect(connection).await.unwrap();

    let of_b = use_case.connections_of(&b.source_id).await.unwrap();
    assert_eq!(of_b.len(), 1);
    assert_eq!(of_b[0].label.as_deref(), Some("cites"));

    use_case.disconnect(&created.connection_id).await.unwrap();
    assert!(use_case.connections_of(&a.source_id).await.unwrap().is_empty());

    let err = use_case.disconnect(&created.connection_id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_connect_missing_source_is_not_found() {
    let env = setup_test_env();
    let use_case = ConnectSourcesUseCase::new(env.graph_repo.clone());

    let connection = Connection::new("u", "w", "missing-a", "missing-b").unwrap();
    let err = use_case.connect(connection).await.unwrap_err();
    assert!(err.is_not_found());
}
