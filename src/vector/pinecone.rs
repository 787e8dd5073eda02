use async_trait::async_trait;
use log::{ debug, info, warn };
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use serde_json::{ Map, Value };
use std::error::Error as StdError;

use super::{ Document, VectorStore };

pub const API_VERSION: &str = "2024-07";

#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    pub host: Option<String>,
    pub controller_url: String,
    pub namespace: Option<String>,
    pub text_key: String,
}

#[derive(Debug, Clone)]
pub struct PineconeStore {
    http: HttpClient,
    api_key: String,
    host: String,
    namespace: Option<String>,
    text_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
}

impl PineconeStore {
    /// Binds to an existing index, resolving its data plane host if none was configured.
    pub async fn connect(config: PineconeConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let http = HttpClient::new();
        let host = match config.host {
            Some(host) => normalize_host(&host),
            None => {
                info!(
                    "Resolving host for Pinecone index '{}' via {}",
                    config.index_name,
                    config.controller_url
                );
                describe_index_host(
                    &http,
                    &config.controller_url,
                    &config.api_key,
                    &config.index_name
                ).await?
            }
        };
        info!("Pinecone index '{}' bound to {}", config.index_name, host);

        Ok(Self {
            http,
            api_key: config.api_key,
            host,
            namespace: config.namespace,
            text_key: config.text_key,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn into_document(&self, hit: QueryMatch) -> Document {
        let mut metadata = hit.metadata.unwrap_or_default();
        let page_content = match metadata.remove(&self.text_key) {
            Some(Value::String(text)) => text,
            Some(other) => other.to_string(),
            None => {
                warn!("Pinecone match '{}' has no '{}' metadata field", hit.id, self.text_key);
                String::new()
            }
        };
        debug!("Pinecone match id={} score={:.4}", hit.id, hit.score);
        Document { page_content, metadata }
    }
}

async fn describe_index_host(
    http: &HttpClient,
    controller_url: &str,
    api_key: &str,
    index_name: &str
) -> Result<String, Box<dyn StdError + Send + Sync>> {
    let url = format!("{}/indexes/{}", controller_url.trim_end_matches('/'), index_name);
    let resp = http
        .get(&url)
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .send().await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(
            format!("Pinecone describe index '{}' failed with status {}: {}", index_name, status, body).into()
        );
    }

    let description = resp.json::<IndexDescription>().await?;
    Ok(normalize_host(&description.host))
}

/// Control plane hosts come back without a scheme.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn similarity_search(
        &self,
        embedding: &[f32],
        k: usize
    ) -> Result<Vec<Document>, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/query", self.host);
        let req = QueryRequest {
            vector: embedding,
            top_k: k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let resp = self.http
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&req)
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("Pinecone query failed with status {}: {}", status, body).into());
        }

        let data = resp.json::<QueryResponse>().await?;
        debug!("Pinecone returned {} matches", data.matches.len());
        Ok(
            data.matches
                .into_iter()
                .map(|hit| self.into_document(hit))
                .collect()
        )
    }
}
