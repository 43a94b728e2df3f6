//! LlmProvider trait definition.

use vasculargpt_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities,
};

/// Trait for chat-completion provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in vasculargpt-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Context and output limits of the configured model.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
