//! OpenAI-compatible chat-completion provider.
//!
//! Any endpoint speaking the OpenAI chat completions protocol works via a
//! configurable base URL. Uses [`async_openai`] for type-safe
//! request/response handling.

pub mod config;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, FinishReason,
    StopConfiguration,
};
use async_openai::Client;
use secrecy::ExposeSecret;

use vasculargpt_core::llm::provider::LlmProvider;
use vasculargpt_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, ProviderCapabilities,
    StopReason, Usage,
};

use self::config::OpenAiCompatConfig;

/// Chat-completion provider for any OpenAI-compatible API.
///
/// # API Key Security
///
/// Does NOT derive Debug: the API key lives inside the
/// `async_openai::Client` configuration.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OpenAiCompatibleProvider {
    /// Create a provider that sends requests through `http_client`.
    ///
    /// The client's request timeout bounds every completion call.
    pub fn new(config: OpenAiCompatConfig, http_client: reqwest::Client) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config).with_http_client(http_client),
            provider_name: config.provider_name,
            model: config.model,
            capabilities: config.capabilities,
        }
    }

    /// Default model used when a request leaves `model` empty.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_openai_message(msg: &Message) -> ChatCompletionRequestMessage {
        match msg.role {
            MessageRole::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::User => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::Assistant => {
                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    )),
                    refusal: None,
                    name: None,
                    audio: None,
                    tool_calls: None,
                    function_call: None,
                })
            }
        }
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref system) = request.system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }
        messages.extend(request.messages.iter().map(Self::to_openai_message));

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        let mut req = CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        };

        if let Some(ref stops) = request.stop_sequences {
            if !stops.is_empty() {
                req.stop = Some(StopConfiguration::StringArray(stops.clone()));
            }
        }

        req
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let first = response.choices.first();
        let content = first.and_then(|c| c.message.content.clone());

        let stop_reason = first
            .and_then(|c| c.finish_reason.as_ref())
            .map(|fr| match fr {
                FinishReason::Stop => StopReason::EndTurn,
                FinishReason::Length => StopReason::MaxTokens,
                FinishReason::ContentFilter => StopReason::ContentFilter,
                FinishReason::ToolCalls | FinishReason::FunctionCall => StopReason::EndTurn,
            })
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("You didn't provide an API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded"
                || code == "insufficient_quota"
                || error_type == "rate_limit_error"
            {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "context_length_exceeded"
                || api_err.message.contains("maximum context length")
            {
                LlmError::ContextLengthExceeded
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            Some(503) => LlmError::Overloaded(err.to_string()),
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}
