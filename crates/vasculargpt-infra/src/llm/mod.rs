//! Chat-completion provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `vasculargpt-core`, and a factory
//! ([`create_chat_provider`]) that builds it from [`LlmConfig`].
//!
//! [`LlmProvider`]: vasculargpt_core::llm::provider::LlmProvider

pub mod openai_compat;

use secrecy::SecretString;

use vasculargpt_core::llm::box_provider::BoxLlmProvider;
use vasculargpt_types::config::LlmConfig;

use self::openai_compat::config::OpenAiCompatConfig;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from an [`LlmConfig`].
///
/// A missing API key is not rejected here: the provider is built with an
/// empty key and the first request fails with an authentication error.
/// Requests go through `http_client`, so its timeout applies.
pub fn create_chat_provider(
    config: &LlmConfig,
    api_key: Option<SecretString>,
    http_client: reqwest::Client,
) -> BoxLlmProvider {
    let api_key = api_key.unwrap_or_else(|| {
        tracing::warn!(
            provider = %config.provider_name,
            "No API key configured for chat completions; requests will fail to authenticate"
        );
        SecretString::from(String::new())
    });

    let provider = OpenAiCompatibleProvider::new(
        OpenAiCompatConfig::from_llm_config(config, api_key),
        http_client,
    );
    BoxLlmProvider::new(provider)
}
