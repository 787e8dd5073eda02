use async_trait::async_trait;
use log::debug;
use rllm::builder::{ LLMBackend, LLMBuilder };
use rllm::LLMProvider;
use std::error::Error as StdError;

use super::{ single_user_message, ChatClient, CompletionResponse };
use crate::llm::LlmConfig;

pub struct OpenAIChatClient {
    llm: Box<dyn LLMProvider + Send + Sync>,
    model: String,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let chat_model = model.unwrap_or_else(|| "gpt-4o-mini".to_string());

        let mut builder = LLMBuilder::new()
            .backend(LLMBackend::OpenAI)
            .api_key(api_key)
            .model(&chat_model)
            .stream(false);

        if let Some(url) = base_url {
            builder = builder.base_url(url);
        }

        let llm = builder.build()?;
        Ok(Self { llm, model: chat_model })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| "OpenAI API key is required for OpenAIChatClient".to_string())?;
        Self::new(api_key, config.completion_model.clone(), config.base_url.clone())
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(
        &self,
        prompt: &str
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        debug!("OpenAIChatClient::complete() → model={}", self.model);
        let resp = self.llm.chat(&single_user_message(prompt)).await?;
        let text = resp
            .text()
            .map(|s| s.to_string())
            .unwrap_or_else(|| resp.to_string());
        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
