//! Runs the real clients against local Pinecone and Ollama lookalikes.

mod common;

use axum::http::StatusCode;
use clap::Parser;
use common::*;
use rag_chat::agent::ChainHandle;
use rag_chat::cli::Args;
use rag_chat::server::api::{ router, AppState };
use rag_chat::server::auth::ApiKeyGuard;
use rag_chat::vector::pinecone::{ PineconeConfig, PineconeStore };
use rag_chat::vector::VectorStore;
use serde_json::{ json, Value };
use std::sync::Arc;

fn pinecone_config(controller_url: &str, host: Option<String>) -> PineconeConfig {
    PineconeConfig {
        api_key: PINECONE_KEY.into(),
        index_name: "docs".into(),
        host,
        controller_url: controller_url.into(),
        namespace: Some("handbook".into()),
        text_key: "text".into(),
    }
}

#[tokio::test]
async fn query_maps_matches_to_documents() {
    let upstream = Upstream::default();
    let base_url = spawn_upstream(upstream.clone()).await;
    let store = PineconeStore::connect(pinecone_config(&base_url, Some(base_url.clone()))).await.unwrap();

    let docs = store.similarity_search(&[0.1, 0.2, 0.3], 2).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].page_content, "Paris is the capital of France.");
    assert_eq!(docs[0].metadata.get("source"), Some(&Value::String("geo.md".into())));
    assert_eq!(docs[1].page_content, "France is in Europe.");

    let queries = upstream.queries.lock().unwrap();
    assert_eq!(
        queries[0],
        json!({
            "vector": [0.1, 0.2, 0.3],
            "topK": 2,
            "includeMetadata": true,
            "includeValues": false,
            "namespace": "handbook"
        })
    );
}

#[tokio::test]
async fn host_is_resolved_through_the_control_plane() {
    let upstream = Upstream::default();
    let base_url = spawn_upstream(upstream).await;

    let store = PineconeStore::connect(pinecone_config(&base_url, None)).await.unwrap();
    assert_eq!(store.host(), base_url);
}

#[tokio::test]
async fn unknown_index_fails_to_connect() {
    let base_url = spawn_upstream(Upstream::default()).await;
    let mut config = pinecone_config(&base_url, None);
    config.index_name = "missing".into();

    let err = PineconeStore::connect(config).await.err().expect("lookup must fail");
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn upstream_error_status_is_an_error() {
    let upstream = Upstream { fail_queries: true, ..Default::default() };
    let base_url = spawn_upstream(upstream).await;
    let store = PineconeStore::connect(pinecone_config(&base_url, Some(base_url.clone()))).await.unwrap();

    let err = store.similarity_search(&[0.1], 4).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn lazily_built_chain_answers_end_to_end() {
    let upstream = Upstream::default();
    let base_url = spawn_upstream(upstream.clone()).await;

    let args = Args::parse_from([
        "rag-chat",
        "--pinecone-api-key",
        PINECONE_KEY,
        "--pinecone-index-name",
        "docs",
        "--pinecone-controller-url",
        base_url.as_str(),
        "--pinecone-host",
        "",
        "--pinecone-namespace",
        "",
        "--prompt-template-path",
        "",
        "--chat-llm-type",
        "ollama",
        "--chat-base-url",
        base_url.as_str(),
        "--embedding-llm-type",
        "ollama",
        "--embedding-base-url",
        base_url.as_str(),
        "--retriever-top-k",
        "3",
    ]);
    let chain = Arc::new(ChainHandle::lazy(args));
    let app = router(AppState { chain: chain.clone() }, ApiKeyGuard::default());

    let body = json!({
        "message": "What is the capital of France?",
        "history": [{ "role": "user", "content": "hi" }, { "role": "bot", "content": "hello" }]
    });
    let (status, resp) = post_json(app.clone(), &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({ "response": " The capital of France is Paris. " }));
    assert!(chain.is_built());

    let (status, _) = post_json(app, &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let queries = upstream.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0]["topK"], json!(3));
    assert!(queries[0].get("namespace").is_none());

    let prompts = upstream.prompts.lock().unwrap();
    assert!(prompts[0].contains("Chat history: user said hi\nbot said hello"));
    assert!(prompts[0].contains("Context: Paris is the capital of France.\n\nFrance is in Europe."));
}
