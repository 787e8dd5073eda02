use async_trait::async_trait;
use std::error::Error as StdError;
use super::{ EmbeddingClient, EmbeddingResponse };
use super::super::LlmConfig;
use rllm::{ builder::{ LLMBackend, LLMBuilder }, LLMProvider };

const DEFAULT_MODEL: &str = "embedding-001";

pub struct GoogleEmbeddingClient {
    llm: Box<dyn LLMProvider + Send + Sync>,
    model: String,
}

impl GoogleEmbeddingClient {
    pub fn new(
        api_key: String,
        model: Option<String>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let embed_model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let llm = LLMBuilder::new()
            .backend(LLMBackend::Google)
            .api_key(api_key)
            .model(&embed_model)
            .stream(false)
            .build()?;

        Ok(Self { llm, model: embed_model })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| "Google API key is required for GoogleEmbeddingClient".to_string())?;
        Self::new(api_key, config.embedding_model.clone())
    }
}

#[async_trait]
impl EmbeddingClient for GoogleEmbeddingClient {
    async fn embed(
        &self,
        text: &str
    ) -> Result<EmbeddingResponse, Box<dyn StdError + Send + Sync>> {
        let mut embeddings = self.llm.embed(vec![text.to_string()]).await?;
        let embedding = embeddings
            .pop()
            .ok_or_else(|| "Google embedding generation returned no results".to_string())?;

        Ok(EmbeddingResponse { embedding })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
