//! OpenAI embeddings client.
//!
//! Sends `POST {base_url}/embeddings` with bearer authentication and maps
//! the response back into one vector per input, in input order.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use vasculargpt_core::retrieval::embedder::Embedder;
use vasculargpt_types::error::RetrievalError;

use crate::llm::openai_compat::config::OPENAI_BASE_URL;

const SERVICE: &str = "openai embeddings";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Embedder backed by the OpenAI embeddings endpoint.
///
/// Does NOT derive Debug to keep the API key out of logs.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: reqwest::Client, api_key: SecretString, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => RetrievalError::AuthenticationFailed {
                    service: SERVICE.to_string(),
                },
                _ => RetrievalError::Embedding(format!("HTTP {status}: {error_body}")),
            });
        }

        let mut parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            RetrievalError::Deserialization(format!("failed to parse embeddings response: {e}"))
        })?;

        if parsed.data.len() != texts.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn embedder(base_url: &str) -> OpenAiEmbedder {
        let client = crate::http_client(Duration::from_secs(5)).unwrap();
        OpenAiEmbedder::new(
            client,
            SecretString::from("sk-test".to_string()),
            "text-embedding-ada-002",
        )
        .with_base_url(base_url)
    }

    #[tokio::test]
    async fn test_embed_orders_by_index() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"object":"list","data":[
                    {"object":"embedding","index":1,"embedding":[0.3,0.4]},
                    {"object":"embedding","index":0,"embedding":[0.1,0.2]}
                ],"model":"text-embedding-ada-002"}"#,
            )
            .create_async()
            .await;

        let vectors = embedder(&server.url())
            .embed(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[tokio::test]
    async fn test_embed_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let err = embedder(&server.url())
            .embed(&["q".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::AuthenticationFailed { .. }));
    }

    #[tokio::test]
    async fn test_embed_count_mismatch() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let err = embedder(&server.url())
            .embed(&["q".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_embed_empty_input_skips_request() {
        let vectors = embedder("http://127.0.0.1:9").embed(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }
}
