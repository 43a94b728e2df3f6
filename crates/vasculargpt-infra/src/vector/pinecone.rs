//! Pinecone index handle.
//!
//! Binding resolves the index's data-plane host through the control plane
//! (`GET /indexes/{name}`); queries go to `POST {host}/query`. The index is
//! never written to.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use vasculargpt_core::retrieval::vector::VectorIndex;
use vasculargpt_types::chat::RetrievedPassage;
use vasculargpt_types::config::RetrieverConfig;
use vasculargpt_types::error::RetrievalError;

const API_KEY_HEADER: &str = "Api-Key";
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";
const API_VERSION: &str = "2024-07";
const SERVICE: &str = "pinecone";

/// Options for binding to an index.
#[derive(Debug, Clone)]
pub struct PineconeOptions {
    pub control_plane_url: String,
    pub namespace: Option<String>,
    /// Metadata key holding the passage text.
    pub text_key: String,
}

impl From<&RetrieverConfig> for PineconeOptions {
    fn from(config: &RetrieverConfig) -> Self {
        Self {
            control_plane_url: config.control_plane_url.clone(),
            namespace: config.namespace.clone(),
            text_key: config.text_key.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
    #[serde(default)]
    dimension: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: Option<f32>,
    #[serde(default)]
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A bound, read-only handle on an existing Pinecone index.
///
/// Does NOT derive Debug to keep the API key out of logs.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: SecretString,
    index_name: String,
    host: String,
    namespace: Option<String>,
    text_key: String,
}

impl PineconeIndex {
    /// Bind to an existing index by name.
    ///
    /// # Errors
    ///
    /// - [`RetrievalError::IndexNotFound`] if the index does not exist
    /// - [`RetrievalError::AuthenticationFailed`] if the key is rejected
    /// - [`RetrievalError::Connection`] if the control plane is unreachable
    ///   or answers with any other failure
    pub async fn connect(
        client: reqwest::Client,
        api_key: SecretString,
        index_name: &str,
        options: PineconeOptions,
    ) -> Result<Self, RetrievalError> {
        let url = format!(
            "{}/indexes/{}",
            options.control_plane_url.trim_end_matches('/'),
            index_name
        );

        let response = client
            .get(&url)
            .header(API_KEY_HEADER, api_key.expose_secret())
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await
            .map_err(|e| RetrievalError::Connection(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => RetrievalError::IndexNotFound(index_name.to_string()),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    RetrievalError::AuthenticationFailed {
                        service: SERVICE.to_string(),
                    }
                }
                _ => RetrievalError::Connection(format!("HTTP {status}: {error_body}")),
            });
        }

        let description: IndexDescription = response.json().await.map_err(|e| {
            RetrievalError::Deserialization(format!("failed to parse index description: {e}"))
        })?;

        let host = normalize_host(&description.host);
        info!(index = index_name, host = %host, dimension = ?description.dimension, "Bound to vector index");

        Ok(Self {
            client,
            api_key,
            index_name: index_name.to_string(),
            host,
            namespace: options.namespace,
            text_key: options.text_key,
        })
    }

    /// Convert a match into a passage, or `None` if it has no text.
    fn to_passage(&self, m: QueryMatch) -> Option<RetrievedPassage> {
        let mut metadata = m.metadata.unwrap_or_default();
        let content = match metadata.remove(&self.text_key) {
            Some(serde_json::Value::String(text)) => text,
            _ => {
                warn!(id = %m.id, text_key = %self.text_key, "Match has no text metadata; skipping");
                return None;
            }
        };

        Some(RetrievedPassage {
            id: Some(m.id),
            content,
            score: m.score,
            metadata,
        })
    }
}

/// Pinecone reports hosts without a scheme; default to HTTPS.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

impl VectorIndex for PineconeIndex {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        let url = format!("{}/query", self.host);
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Connection(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    RetrievalError::AuthenticationFailed {
                        service: SERVICE.to_string(),
                    }
                }
                _ => RetrievalError::Query(format!("HTTP {status}: {error_body}")),
            });
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            RetrievalError::Deserialization(format!("failed to parse query response: {e}"))
        })?;

        let passages: Vec<RetrievedPassage> = parsed
            .matches
            .into_iter()
            .filter_map(|m| self.to_passage(m))
            .collect();
        debug!(index = %self.index_name, count = passages.len(), "Query returned passages");
        Ok(passages)
    }
}
