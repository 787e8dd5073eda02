use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;
use super::{ EmbeddingClient, EmbeddingResponse };
use super::super::LlmConfig;

#[derive(Debug)]
pub struct OllamaEmbeddingClient {
    http: HttpClient,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbeddingClient {
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        let url = base_url.unwrap_or_else(|| "http://localhost:11434".to_string());
        let embed_model = model.unwrap_or_else(|| "nomic-embed-text".to_string());

        Self {
            http: HttpClient::new(),
            base_url: url.trim_end_matches('/').to_string(),
            model: embed_model,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(Self::new(config.base_url.clone(), config.embedding_model.clone()))
    }
}

#[async_trait]
impl EmbeddingClient for OllamaEmbeddingClient {
    async fn embed(
        &self,
        text: &str
    ) -> Result<EmbeddingResponse, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let req = EmbeddingsRequest { model: &self.model, prompt: text };
        let resp = self.http.post(&url).json(&req).send().await?.error_for_status()?;
        let data = resp.json::<EmbeddingsResponse>().await?;
        if data.embedding.is_empty() {
            return Err("Ollama embedding generation returned an empty vector".into());
        }
        Ok(EmbeddingResponse { embedding: data.embedding })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
