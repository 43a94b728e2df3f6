//! Configuration for OpenAI-compatible providers.

use secrecy::SecretString;

use vasculargpt_types::config::LlmConfig;
use vasculargpt_types::llm::ProviderCapabilities;

/// Base URL of the public OpenAI API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible chat-completion provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

impl OpenAiCompatConfig {
    pub fn from_llm_config(config: &LlmConfig, api_key: SecretString) -> Self {
        Self {
            provider_name: config.provider_name.clone(),
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            capabilities: capabilities_for_model(&config.model),
        }
    }
}

/// Context/output limits by model family.
pub fn capabilities_for_model(model: &str) -> ProviderCapabilities {
    if model.starts_with("gpt-4o") || model.starts_with("gpt-4-turbo") {
        ProviderCapabilities {
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        }
    } else if model.starts_with("gpt-4") {
        ProviderCapabilities {
            max_context_tokens: 8_192,
            max_output_tokens: 4_096,
        }
    } else if model.starts_with("gpt-3.5-turbo") {
        ProviderCapabilities {
            max_context_tokens: 16_385,
            max_output_tokens: 4_096,
        }
    } else {
        // Conservative defaults for unknown models
        ProviderCapabilities {
            max_context_tokens: 8_192,
            max_output_tokens: 2_048,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_by_family() {
        assert_eq!(capabilities_for_model("gpt-4o-mini").max_context_tokens, 128_000);
        assert_eq!(capabilities_for_model("gpt-4").max_context_tokens, 8_192);
        assert_eq!(capabilities_for_model("gpt-3.5-turbo").max_output_tokens, 4_096);
        assert_eq!(capabilities_for_model("llama-3").max_output_tokens, 2_048);
    }

    #[test]
    fn test_from_llm_config_defaults() {
        let config = OpenAiCompatConfig::from_llm_config(
            &LlmConfig::default(),
            SecretString::from("sk".to_string()),
        );
        assert_eq!(config.provider_name, "openai");
        assert_eq!(config.base_url, OPENAI_BASE_URL);
        assert_eq!(config.capabilities.max_output_tokens, 4_096);
    }
}
