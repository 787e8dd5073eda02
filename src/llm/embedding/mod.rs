pub mod ollama;
pub mod openai;
pub mod gemini;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;

use super::{ LlmConfig, LlmType };
use self::ollama::OllamaEmbeddingClient;
use self::openai::OpenAIEmbeddingClient;
use self::gemini::GoogleEmbeddingClient;

#[derive(Debug, Clone)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
}

/// Turns query text into the vector the index was built with.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingResponse, Box<dyn StdError + Send + Sync>>;

    fn get_model(&self) -> String;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn EmbeddingClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn EmbeddingClient> = match config.llm_type {
        LlmType::Gemini => Arc::new(GoogleEmbeddingClient::from_config(config)?),
        LlmType::OpenAI => Arc::new(OpenAIEmbeddingClient::from_config(config)?),
        LlmType::Ollama => Arc::new(OllamaEmbeddingClient::from_config(config)?),
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_requires_api_key() {
        let config = LlmConfig { llm_type: LlmType::Gemini, ..LlmConfig::default() };
        let err = new_client(&config).err().expect("missing key must fail");
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn ollama_uses_default_model() {
        let config = LlmConfig { llm_type: LlmType::Ollama, ..LlmConfig::default() };
        let client = new_client(&config).unwrap();
        assert_eq!(client.get_model(), "nomic-embed-text");
    }
}
