use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::prompt::PromptTemplate;
use super::ChainError;
use crate::llm::chat::ChatClient;
use crate::vector::Document;

pub const DEFAULT_DOCUMENT_SEPARATOR: &str = "\n\n";
pub const CONTEXT_KEY: &str = "context";

/// Stuffs every retrieved document into the `context` variable of a single prompt.
pub struct StuffDocumentsChain {
    llm: Arc<dyn ChatClient>,
    prompt: PromptTemplate,
}

impl StuffDocumentsChain {
    pub fn new(llm: Arc<dyn ChatClient>, prompt: PromptTemplate) -> Self {
        Self { llm, prompt }
    }

    pub fn format_documents(&self, documents: &[Document]) -> String {
        documents
            .iter()
            .map(|doc| doc.page_content.as_str())
            .collect::<Vec<_>>()
            .join(DEFAULT_DOCUMENT_SEPARATOR)
    }

    pub fn build_prompt(
        &self,
        documents: &[Document],
        mut variables: HashMap<String, String>
    ) -> Result<String, ChainError> {
        variables.insert(CONTEXT_KEY.to_string(), self.format_documents(documents));
        Ok(self.prompt.format(&variables)?)
    }

    pub async fn invoke(
        &self,
        documents: &[Document],
        variables: HashMap<String, String>
    ) -> Result<String, ChainError> {
        let prompt = self.build_prompt(documents, variables)?;
        debug!("--- Final Answer Prompt ---\n{}\n--------------------------", prompt);

        let resp = self.llm.complete(&prompt).await.map_err(ChainError::Generation)?;
        Ok(resp.response)
    }
}
