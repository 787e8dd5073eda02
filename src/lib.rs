pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod rag;
pub mod server;
pub mod vector;

use agent::ChainHandle;
use cli::{ mask_secret, non_empty, Args };
use log::{ info, warn };
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Server API Key: {}", mask_secret(&args.server_api_key));
    info!("Pinecone Index: {}", non_empty(&args.pinecone_index_name).as_deref().unwrap_or("not set"));
    info!("Pinecone Host: {}", non_empty(&args.pinecone_host).as_deref().unwrap_or("resolve via control plane"));
    info!("Pinecone Namespace: {}", non_empty(&args.pinecone_namespace).as_deref().unwrap_or("default"));
    info!("Pinecone API Key: {}", mask_secret(&args.pinecone_api_key));
    info!("Retriever Top K: {}", args.retriever_top_k);
    info!("Embedding LLM Type: {}", args.embedding_llm_type);
    info!("Embedding API Key: {}", mask_secret(&args.embedding_api_key));
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat API Key: {}", mask_secret(&args.chat_api_key));
    info!("Prompt Template: {}", non_empty(&args.prompt_template_path).as_deref().unwrap_or("built-in"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let chain = Arc::new(ChainHandle::lazy(args.clone()));
    if let Err(e) = chain.get().await {
        warn!("Retrieval chain not ready at startup, will retry on first request: {}", e);
    }

    let server = Server::new(args.server_addr.clone(), chain, args);
    server.run().await?;

    Ok(())
}
