pub mod history;
pub mod prompt;
pub mod retrieval;
pub mod stuff;

use std::error::Error as StdError;
use thiserror::Error;

use self::prompt::PromptError;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Embedding failed: {0}")]
    Embedding(#[source] Box<dyn StdError + Send + Sync>),
    #[error("Retrieval failed: {0}")]
    Retrieval(#[source] Box<dyn StdError + Send + Sync>),
    #[error("Final completion failed: {0}")]
    Generation(#[source] Box<dyn StdError + Send + Sync>),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use std::error::Error as StdError;
    use std::sync::Mutex;

    use crate::llm::chat::{ ChatClient, CompletionResponse };
    use crate::llm::embedding::{ EmbeddingClient, EmbeddingResponse };
    use crate::vector::{ Document, VectorStore };

    pub struct FixedEmbedding;

    #[async_trait]
    impl EmbeddingClient for FixedEmbedding {
        async fn embed(
            &self,
            text: &str
        ) -> Result<EmbeddingResponse, Box<dyn StdError + Send + Sync>> {
            Ok(EmbeddingResponse { embedding: vec![text.len() as f32, 1.0] })
        }

        fn get_model(&self) -> String {
            "fixed".into()
        }
    }

    pub struct StaticStore {
        pub documents: Vec<Document>,
        pub fail: bool,
    }

    #[async_trait]
    impl VectorStore for StaticStore {
        async fn similarity_search(
            &self,
            _embedding: &[f32],
            k: usize
        ) -> Result<Vec<Document>, Box<dyn StdError + Send + Sync>> {
            if self.fail {
                return Err("index unreachable".into());
            }
            Ok(self.documents.iter().take(k).cloned().collect())
        }
    }

    /// Echoes a fixed answer and remembers every prompt it was given.
    #[derive(Default)]
    pub struct RecordingChat {
        pub answer: String,
        pub prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatClient for RecordingChat {
        async fn complete(
            &self,
            prompt: &str
        ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(CompletionResponse { response: self.answer.clone() })
        }

        fn get_model(&self) -> String {
            "recording".into()
        }
    }
}
