use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::stuff::{ StuffDocumentsChain, CONTEXT_KEY };
use super::ChainError;
use crate::llm::embedding::EmbeddingClient;
use crate::vector::{ Document, VectorStore };

pub const DEFAULT_TOP_K: usize = 4;

pub struct VectorStoreRetriever {
    vector_store: Arc<dyn VectorStore>,
    embedding_client: Arc<dyn EmbeddingClient>,
    k: usize,
}

impl VectorStoreRetriever {
    pub fn new(
        vector_store: Arc<dyn VectorStore>,
        embedding_client: Arc<dyn EmbeddingClient>,
        k: usize
    ) -> Self {
        Self { vector_store, embedding_client, k }
    }

    pub async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, ChainError> {
        let embed_resp = self.embedding_client.embed(query).await.map_err(ChainError::Embedding)?;
        self.vector_store
            .similarity_search(&embed_resp.embedding, self.k).await
            .map_err(ChainError::Retrieval)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChainInput {
    pub input: String,
    pub chat_history: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainOutput {
    pub input: String,
    pub chat_history: String,
    pub context: Vec<Document>,
    pub answer: String,
}

/// Every variable the chain supplies to the answer template.
pub const TEMPLATE_VARIABLES: &[&str] = &["input", "question", "chat_history", CONTEXT_KEY];

/// Retrieves with the user's input, then answers from the retrieved documents.
pub struct RetrievalChain {
    retriever: VectorStoreRetriever,
    combine_docs_chain: StuffDocumentsChain,
}

impl RetrievalChain {
    pub fn new(retriever: VectorStoreRetriever, combine_docs_chain: StuffDocumentsChain) -> Self {
        Self { retriever, combine_docs_chain }
    }

    pub async fn invoke(&self, input: ChainInput) -> Result<ChainOutput, ChainError> {
        let context = self.retriever.get_relevant_documents(&input.input).await?;
        info!("→ Retrieved {} documents for the question", context.len());

        // templates may name the question either way
        let mut variables = HashMap::new();
        variables.insert("input".to_string(), input.input.clone());
        variables.insert("question".to_string(), input.input.clone());
        variables.insert("chat_history".to_string(), input.chat_history.clone());

        let answer = self.combine_docs_chain.invoke(&context, variables).await?;

        Ok(ChainOutput {
            input: input.input,
            chat_history: input.chat_history,
            context,
            answer,
        })
    }
}
