//! Application configuration types.
//!
//! `AppConfig` mirrors `vasculargpt.toml`. Every field has a default, so an
//! empty or missing file yields a working configuration.

use serde::{Deserialize, Serialize};

/// Index name used when the secret store has no `PINECONE_INDEX` entry.
pub const DEFAULT_INDEX_NAME: &str = "vasculargpt";

/// Number of passages the retriever returns per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub retriever: RetrieverConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Static texts rendered by the page shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub page_title: String,
    pub sidebar_title: String,
    pub sidebar_description: String,
    pub title: String,
    pub description: String,
    pub input_label: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_title: "VascularGPT".to_string(),
            sidebar_title: "VascularGPT".to_string(),
            sidebar_description: "Ask your vascular-related questions!".to_string(),
            title: "Welcome to VascularGPT".to_string(),
            description: "Your AI assistant for vascular knowledge.".to_string(),
            input_label: "Enter your question here:".to_string(),
        }
    }
}

/// Vector index and embedding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Passages returned per query.
    pub top_k: usize,
    /// Pinecone namespace; `None` queries the default namespace.
    pub namespace: Option<String>,
    /// Metadata key holding the passage text.
    pub text_key: String,
    /// Pinecone control-plane base URL.
    pub control_plane_url: String,
    pub embedding_model: String,
    pub embedding_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            namespace: None,
            text_key: "text".to_string(),
            control_plane_url: "https://api.pinecone.io".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            embedding_base_url: "https://api.openai.com/v1".to_string(),
            request_timeout_secs: 300,
        }
    }
}

/// Chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider_name: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider_name: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Answering-pipeline behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rephrase follow-up questions into standalone ones before retrieval.
    pub condense_question: bool,
}

/// HTTP server and session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sessions idle for longer than this are evicted.
    pub session_ttl_secs: u64,
    /// Flat key/value TOML file consulted after environment variables.
    pub secrets_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            session_ttl_secs: 24 * 60 * 60,
            secrets_path: "secrets.toml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.retriever.top_k, 5);
        assert_eq!(config.retriever.text_key, "text");
        assert_eq!(config.page.sidebar_title, "VascularGPT");
        assert!(!config.pipeline.condense_question);
        assert_eq!(config.server.port, 8501);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.retriever.embedding_model, "text-embedding-ada-002");
    }

    #[test]
    fn test_deserialize_partial_section() {
        let toml_str = r#"
[llm]
model = "gpt-4o"

[retriever]
namespace = "guidelines"

[pipeline]
condense_question = true
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.retriever.namespace.as_deref(), Some("guidelines"));
        assert_eq!(config.retriever.top_k, 5);
        assert!(config.pipeline.condense_question);
    }
}
