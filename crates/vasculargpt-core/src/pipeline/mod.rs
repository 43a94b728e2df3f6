//! Conversational retrieval question answering.
//!
//! [`AnswerPipeline`] is the seam the session controller calls through;
//! [`ConversationalRetrievalPipeline`] is the production implementation that
//! retrieves passages and asks the chat-completion provider for an answer.

pub mod conversational;
pub mod prompt;

pub use conversational::{ConversationalRetrievalPipeline, PipelineSettings};

use vasculargpt_types::chat::{ChatTurn, PipelineAnswer};
use vasculargpt_types::error::PipelineError;

/// Answers a question given the conversation so far.
pub trait AnswerPipeline: Send + Sync {
    /// Produce an answer plus the passages used to ground it.
    ///
    /// `history` is the session's full turn sequence as passed by the caller.
    fn invoke(
        &self,
        question: &str,
        history: &[ChatTurn],
    ) -> impl std::future::Future<Output = Result<PipelineAnswer, PipelineError>> + Send;
}
