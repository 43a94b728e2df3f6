//! Conversational retrieval pipeline.
//!
//! Per invocation: optionally condense the follow-up into a standalone
//! question, retrieve passages, then ask the chat model with the passages as
//! context. Nothing is cached and nothing is retried; every external failure
//! is returned to the caller unchanged.

use tracing::{debug, info_span, Instrument};

use vasculargpt_types::chat::{ChatTurn, PipelineAnswer};
use vasculargpt_types::config::{LlmConfig, PipelineConfig};
use vasculargpt_types::error::PipelineError;
use vasculargpt_types::llm::{CompletionRequest, LlmError, Message};

use crate::llm::box_provider::BoxLlmProvider;
use crate::retrieval::retriever::PassageRetriever;

use super::prompt;
use super::AnswerPipeline;

/// Temperature for the condense step; rephrasing should be deterministic.
const CONDENSE_TEMPERATURE: f64 = 0.0;
const CONDENSE_MAX_TOKENS: u32 = 256;

/// Request parameters for the chat-completion calls.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Empty means the provider's configured default model.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub condense_question: bool,
}

impl PipelineSettings {
    pub fn from_config(llm: &LlmConfig, pipeline: &PipelineConfig) -> Self {
        Self {
            model: llm.model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            condense_question: pipeline.condense_question,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default(), &PipelineConfig::default())
    }
}

/// Retrieval-augmented conversational QA over a [`PassageRetriever`].
pub struct ConversationalRetrievalPipeline<R: PassageRetriever> {
    llm: BoxLlmProvider,
    retriever: R,
    settings: PipelineSettings,
}

impl<R: PassageRetriever> ConversationalRetrievalPipeline<R> {
    /// Wire a provider and retriever together. No I/O happens here.
    pub fn new(llm: BoxLlmProvider, retriever: R, settings: PipelineSettings) -> Self {
        Self {
            llm,
            retriever,
            settings,
        }
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Configured `max_tokens`, capped at the model's output limit.
    fn answer_token_limit(&self) -> u32 {
        let limit = self.llm.capabilities().max_output_tokens;
        if self.settings.max_tokens > limit {
            debug!(
                requested = self.settings.max_tokens,
                limit,
                "Capping max_tokens to the model's output limit"
            );
            return limit;
        }
        self.settings.max_tokens
    }

    /// The question used for retrieval.
    ///
    /// With condensing enabled and at least one answered turn in history,
    /// the model rewrites the follow-up into a standalone question.
    async fn retrieval_question(
        &self,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String, LlmError> {
        if !self.settings.condense_question || prompt::answered_turns(history).next().is_none() {
            return Ok(question.to_string());
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt::condense_prompt(question, history))],
            system: None,
            max_tokens: CONDENSE_MAX_TOKENS,
            temperature: Some(CONDENSE_TEMPERATURE),
            stop_sequences: None,
        };

        let span = info_span!(
            "gen_ai.condense",
            gen_ai.system = self.llm.name(),
            gen_ai.request.model = %request.model,
        );
        let response = self.llm.complete(&request).instrument(span).await?;

        let standalone = response
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| question.to_string());
        debug!(standalone = %standalone, "Condensed follow-up question");
        Ok(standalone)
    }
}

impl<R: PassageRetriever> AnswerPipeline for ConversationalRetrievalPipeline<R> {
    async fn invoke(
        &self,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<PipelineAnswer, PipelineError> {
        let retrieval_question = self.retrieval_question(question, history).await?;
        let passages = self.retriever.retrieve(&retrieval_question).await?;

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: prompt::qa_messages(question, history),
            system: Some(prompt::qa_system_prompt(&passages)),
            max_tokens: self.answer_token_limit(),
            temperature: Some(self.settings.temperature),
            stop_sequences: None,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.llm.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
        );
        let response = self
            .llm
            .complete(&request)
            .instrument(span.clone())
            .await?;
        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);

        Ok(PipelineAnswer {
            answer: response.content,
            source_documents: passages,
        })
    }
}
