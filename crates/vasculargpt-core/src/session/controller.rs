//! Session controller: one submission = one appended turn.
//!
//! Flow per non-empty question:
//! 1. append `(question, "")`
//! 2. invoke the pipeline with the question and the full turn sequence,
//!    including the pending turn just appended
//! 3. replace the last turn with `(question, answer)`
//! 4. render the answer and the top source passage
//!
//! If step 2 fails, step 3 never runs: the pending turn stays in the
//! session and the error is returned unchanged.

use tracing::{error, info};

use vasculargpt_types::chat::{ChatSession, RenderedAnswer};
use vasculargpt_types::error::PipelineError;

use crate::pipeline::AnswerPipeline;

/// Drives submissions against a session using an [`AnswerPipeline`].
pub struct SessionController<P: AnswerPipeline> {
    pipeline: P,
}

impl<P: AnswerPipeline> SessionController<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Handle one submission.
    ///
    /// Returns `Ok(None)` for an empty question: nothing is appended and the
    /// pipeline is not called.
    pub async fn submit(
        &self,
        session: &mut ChatSession,
        question: &str,
    ) -> Result<Option<RenderedAnswer>, PipelineError> {
        if question.is_empty() {
            return Ok(None);
        }

        session.begin_turn(question);

        let result = match self.pipeline.invoke(question, &session.turns).await {
            Ok(result) => result,
            Err(e) => {
                error!(session_id = %session.id, turn = session.len(), error = %e, "Pipeline call failed");
                return Err(e);
            }
        };

        let rendered = result.render();
        session.resolve_last(&rendered.answer);

        info!(
            session_id = %session.id,
            turn = session.len(),
            sources = result.source_documents.len(),
            "Answered question"
        );

        Ok(Some(rendered))
    }
}
