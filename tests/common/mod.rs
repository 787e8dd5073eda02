#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{ Path, State },
    http::{ HeaderMap, Request, StatusCode },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use rag_chat::llm::chat::{ ChatClient, CompletionResponse };
use rag_chat::llm::embedding::{ EmbeddingClient, EmbeddingResponse };
use rag_chat::rag::prompt::PromptTemplate;
use rag_chat::rag::retrieval::{ RetrievalChain, VectorStoreRetriever };
use rag_chat::rag::stuff::StuffDocumentsChain;
use rag_chat::vector::{ Document, VectorStore };
use serde_json::{ json, Value };
use std::error::Error;
use std::sync::{ Arc, Mutex };
use tower::ServiceExt;

pub const PINECONE_KEY: &str = "test-pinecone-key";

pub struct FixedEmbedding;

#[async_trait]
impl EmbeddingClient for FixedEmbedding {
    async fn embed(&self, _text: &str) -> Result<EmbeddingResponse, Box<dyn Error + Send + Sync>> {
        Ok(EmbeddingResponse { embedding: vec![0.1, 0.2, 0.3] })
    }

    fn get_model(&self) -> String {
        "fixed".into()
    }
}

pub struct StubStore {
    pub documents: Vec<Document>,
    pub fail: bool,
}

#[async_trait]
impl VectorStore for StubStore {
    async fn similarity_search(
        &self,
        _embedding: &[f32],
        k: usize
    ) -> Result<Vec<Document>, Box<dyn Error + Send + Sync>> {
        if self.fail {
            return Err("vector store unavailable".into());
        }
        Ok(self.documents.iter().take(k).cloned().collect())
    }
}

#[derive(Default)]
pub struct RecordingChat {
    pub answer: String,
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, Box<dyn Error + Send + Sync>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(CompletionResponse { response: self.answer.clone() })
    }

    fn get_model(&self) -> String {
        "recording".into()
    }
}

pub fn stub_chain(store: StubStore, llm: Arc<RecordingChat>) -> RetrievalChain {
    let retriever = VectorStoreRetriever::new(Arc::new(store), Arc::new(FixedEmbedding), 4);
    RetrievalChain::new(retriever, StuffDocumentsChain::new(llm, PromptTemplate::default_answer()))
}

pub fn capital_docs() -> Vec<Document> {
    vec![
        Document::new("Paris is the capital of France."),
        Document::new("Berlin is the capital of Germany.")
    ]
}

pub async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, value)
}

/// Requests seen by the fake upstream, in arrival order.
#[derive(Clone, Default)]
pub struct Upstream {
    pub queries: Arc<Mutex<Vec<Value>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub base_url: Arc<Mutex<String>>,
    pub fail_queries: bool,
}

async fn pinecone_query(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<Value>
) -> Response {
    if headers.get("Api-Key").and_then(|v| v.to_str().ok()) != Some(PINECONE_KEY) {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }
    if upstream.fail_queries {
        return (StatusCode::SERVICE_UNAVAILABLE, "index is scaling").into_response();
    }
    upstream.queries.lock().unwrap().push(body);
    Json(
        json!({
            "matches": [
                { "id": "doc-1", "score": 0.92, "metadata": { "text": "Paris is the capital of France.", "source": "geo.md" } },
                { "id": "doc-2", "score": 0.81, "metadata": { "text": "France is in Europe." } }
            ],
            "namespace": ""
        })
    ).into_response()
}

async fn describe_index(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Path(name): Path<String>
) -> Response {
    if headers.get("Api-Key").and_then(|v| v.to_str().ok()) != Some(PINECONE_KEY) {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }
    if name != "docs" {
        return (StatusCode::NOT_FOUND, "no such index").into_response();
    }
    let host = upstream.base_url.lock().unwrap().clone();
    Json(json!({ "name": name, "host": host, "dimension": 3 })).into_response()
}

async fn ollama_embeddings() -> Json<Value> {
    Json(json!({ "embedding": [0.1, 0.2, 0.3] }))
}

async fn ollama_generate(State(upstream): State<Upstream>, Json(body): Json<Value>) -> Json<Value> {
    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
    upstream.prompts.lock().unwrap().push(prompt);
    Json(json!({ "response": " The capital of France is Paris. ", "done": true }))
}

/// Serves Pinecone and Ollama lookalikes on an ephemeral local port.
pub async fn spawn_upstream(upstream: Upstream) -> String {
    let app = Router::new()
        .route("/query", post(pinecone_query))
        .route("/indexes/{name}", get(describe_index))
        .route("/api/embeddings", post(ollama_embeddings))
        .route("/api/generate", post(ollama_generate))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    *upstream.base_url.lock().unwrap() = base_url.clone();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base_url
}
