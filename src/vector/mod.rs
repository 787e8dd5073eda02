pub mod pinecone;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use serde_json::{ Map, Value };
use std::error::Error as StdError;

/// A retrieved chunk of text plus whatever metadata was stored next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self { page_content: page_content.into(), metadata: Map::new() }
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Nearest neighbours of `embedding`, most similar first.
    async fn similarity_search(
        &self,
        embedding: &[f32],
        k: usize
    ) -> Result<Vec<Document>, Box<dyn StdError + Send + Sync>>;
}
