use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// Optional API Key required on every request (X-API-Key header or api_key query parameter).
    #[arg(long, env = "SERVER_API_KEY")]
    pub server_api_key: Option<String>,

    // --- Pinecone Args ---
    /// API key for the Pinecone project holding the index.
    #[arg(long, env = "PINECONE_API_KEY")]
    pub pinecone_api_key: Option<String>,

    /// Name of the existing Pinecone index to query.
    #[arg(long, env = "PINECONE_INDEX_NAME")]
    pub pinecone_index_name: Option<String>,

    /// Data plane host of the index. Looked up through the control plane when not set.
    #[arg(long, env = "PINECONE_HOST")]
    pub pinecone_host: Option<String>,

    /// Pinecone control plane base URL, used to resolve the index host.
    #[arg(long, env = "PINECONE_CONTROLLER_URL", default_value = "https://api.pinecone.io")]
    pub pinecone_controller_url: String,

    /// Namespace to query within the index.
    #[arg(long, env = "PINECONE_NAMESPACE")]
    pub pinecone_namespace: Option<String>,

    /// Metadata field that holds the document text.
    #[arg(long, env = "PINECONE_TEXT_KEY", default_value = "text")]
    pub pinecone_text_key: String,

    /// Number of documents retrieved per question.
    #[arg(long, env = "RETRIEVER_TOP_K", default_value = "4")]
    pub retriever_top_k: usize,

    // --- Embedding LLM Provider Args ---
    /// Type of LLM provider for text embedding (gemini, openai, ollama)
    #[arg(long, env = "EMBEDDING_LLM_TYPE", default_value = "gemini")]
    pub embedding_llm_type: String,

    /// API Key for the Embedding LLM provider. Despite the env name, it holds the key of whichever
    /// provider EMBEDDING_LLM_TYPE selects (Google or OpenAI); Ollama needs none.
    #[arg(long, env = "GOOGLE_GENERATIVE_AI_API_KEY")]
    pub embedding_api_key: Option<String>,

    /// Model name for text embedding (e.g., embedding-001, text-embedding-3-small)
    #[arg(long, env = "EMBEDDING_MODEL")] // No default, rely on adapter defaults if None
    pub embedding_model: Option<String>,

    /// Base URL for the Embedding LLM provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "EMBEDDING_BASE_URL")]
    pub embedding_base_url: Option<String>,

    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (gemini, openai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "gemini")]
    pub chat_llm_type: String,

    /// API Key for the Chat LLM provider. Despite the env name, it holds the key of whichever
    /// provider CHAT_LLM_TYPE selects (Google or OpenAI); Ollama needs none.
    #[arg(long, env = "GOOGLE_API_KEY")]
    pub chat_api_key: Option<String>,

    /// Model name for chat completion (e.g., gemini-pro, gpt-4o, llama3)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Base URL for the Chat LLM provider API
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    // --- Prompt Args ---
    /// Optional path to a prompt template file replacing the built-in answer template.
    #[arg(long, env = "PROMPT_TEMPLATE_PATH")]
    pub prompt_template_path: Option<String>,

    // --- TLS Args ---
    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,
}

/// Treats unset and blank values alike.
pub fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn mask_secret(value: &Option<String>) -> &'static str {
    if non_empty(value).is_some() { "set" } else { "not set" }
}
