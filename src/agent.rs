use crate::cli::{ non_empty, Args };
use crate::config::prompt::load_answer_template;
use crate::llm::LlmConfig;
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::llm::embedding::{ EmbeddingClient, new_client as new_embedding_client };
use crate::rag::retrieval::{ RetrievalChain, VectorStoreRetriever };
use crate::rag::stuff::StuffDocumentsChain;
use crate::vector::VectorStore;
use crate::vector::pinecone::{ PineconeConfig, PineconeStore };

use log::info;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration for {name}: {reason}")]
    Invalid {
        name: &'static str,
        reason: String,
    },
}

/// Shared retrieval chain, built on first use and reused by every request.
///
/// A failed build is not remembered, so the next request tries again.
pub struct ChainHandle {
    args: Option<Args>,
    chain: OnceCell<Arc<RetrievalChain>>,
}

impl ChainHandle {
    pub fn lazy(args: Args) -> Self {
        Self { args: Some(args), chain: OnceCell::new() }
    }

    pub fn ready(chain: RetrievalChain) -> Self {
        Self { args: None, chain: OnceCell::from(Arc::new(chain)) }
    }

    pub fn is_built(&self) -> bool {
        self.chain.initialized()
    }

    pub async fn get(&self) -> Result<Arc<RetrievalChain>, Box<dyn Error + Send + Sync>> {
        let chain = self.chain.get_or_try_init(|| self.build()).await?;
        Ok(Arc::clone(chain))
    }

    async fn build(&self) -> Result<Arc<RetrievalChain>, Box<dyn Error + Send + Sync>> {
        let args = self.args
            .as_ref()
            .ok_or("No configuration available to build the retrieval chain")?;
        info!("Building retrieval chain...");
        let chain = build_chain(args).await?;
        info!("Retrieval chain ready.");
        Ok(Arc::new(chain))
    }
}

fn initialize_llm_clients(
    args: &Args
) -> Result<(Arc<dyn ChatClient>, Arc<dyn EmbeddingClient>), Box<dyn Error + Send + Sync>> {
    let chat_config = LlmConfig {
        llm_type: args.chat_llm_type.parse()?,
        base_url: non_empty(&args.chat_base_url),
        api_key: non_empty(&args.chat_api_key),
        completion_model: non_empty(&args.chat_model),
        embedding_model: None,
    };
    let chat_client = new_chat_client(&chat_config)?;
    info!(
        "Chat client configured: Type={}, Model={}, BaseURL={:?}",
        chat_config.llm_type,
        chat_client.get_model(),
        chat_config.base_url.as_deref().unwrap_or("adapter default")
    );

    let embedding_config = LlmConfig {
        llm_type: args.embedding_llm_type.parse()?,
        base_url: non_empty(&args.embedding_base_url),
        api_key: non_empty(&args.embedding_api_key),
        completion_model: None,
        embedding_model: non_empty(&args.embedding_model),
    };
    let embedding_client = new_embedding_client(&embedding_config)?;
    info!(
        "Embedding client configured: Type={}, Model={}, BaseURL={:?}",
        embedding_config.llm_type,
        embedding_client.get_model(),
        embedding_config.base_url.as_deref().unwrap_or("adapter default")
    );

    Ok((chat_client, embedding_client))
}

async fn initialize_vector_store(
    args: &Args
) -> Result<Arc<dyn VectorStore>, Box<dyn Error + Send + Sync>> {
    let api_key = non_empty(&args.pinecone_api_key).ok_or(ConfigError::Missing("PINECONE_API_KEY"))?;
    let index_name = non_empty(&args.pinecone_index_name).ok_or(
        ConfigError::Missing("PINECONE_INDEX_NAME")
    )?;

    let store = PineconeStore::connect(PineconeConfig {
        api_key,
        index_name,
        host: non_empty(&args.pinecone_host),
        controller_url: args.pinecone_controller_url.clone(),
        namespace: non_empty(&args.pinecone_namespace),
        text_key: args.pinecone_text_key.clone(),
    }).await?;
    Ok(Arc::new(store))
}

/// Validates configuration and wires the collaborators into a retrieval chain.
pub async fn build_chain(args: &Args) -> Result<RetrievalChain, Box<dyn Error + Send + Sync>> {
    if args.retriever_top_k == 0 {
        return Err(
            Box::new(ConfigError::Invalid {
                name: "RETRIEVER_TOP_K",
                reason: "must be at least 1".into(),
            })
        );
    }

    let template = load_answer_template(non_empty(&args.prompt_template_path).as_deref())?;
    let (chat_client, embedding_client) = initialize_llm_clients(args)?;
    let vector_store = initialize_vector_store(args).await?;

    let retriever = VectorStoreRetriever::new(vector_store, embedding_client, args.retriever_top_k);
    let combine_docs_chain = StuffDocumentsChain::new(chat_client, template);
    Ok(RetrievalChain::new(retriever, combine_docs_chain))
}
