//! Chat turn, session and retrieval result types.
//!
//! A session is an append-only sequence of [`ChatTurn`]s. Each submission
//! produces one turn whose answer starts empty and is filled in once the
//! answering pipeline returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Displayed when the pipeline produced no answer text.
pub const NO_ANSWER_FOUND: &str = "No answer found.";

/// Displayed when the pipeline returned no source passages.
pub const NO_SOURCE_DOCUMENT_FOUND: &str = "No source document found.";

/// One question/answer exchange within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

impl ChatTurn {
    /// A turn that has been submitted but not yet answered.
    pub fn pending(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: String::new(),
        }
    }

    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Whether the answer has not been filled in yet.
    pub fn is_pending(&self) -> bool {
        self.answer.is_empty()
    }
}

/// Conversation state for one browser session.
///
/// Turns are only ever appended or have their last answer replaced;
/// nothing is removed for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub turns: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create an empty session with the given ID.
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            turns: Vec::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a pending turn for `question` and return its index.
    pub fn begin_turn(&mut self, question: &str) -> usize {
        self.turns.push(ChatTurn::pending(question));
        self.last_active_at = Utc::now();
        self.turns.len() - 1
    }

    /// Replace the last turn with `(question, answer)`.
    ///
    /// Returns `false` when the session has no turns.
    pub fn resolve_last(&mut self, answer: &str) -> bool {
        match self.turns.last_mut() {
            Some(turn) => {
                turn.answer = answer.to_string();
                self.last_active_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

/// A passage returned by the retriever for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Vector ID in the remote index, when the index reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The passage text.
    pub content: String,
    /// Similarity score reported by the index (higher is more similar).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Remaining metadata stored alongside the vector.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl RetrievedPassage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            score: None,
            metadata: serde_json::Map::new(),
        }
    }
}

/// Result of one answering-pipeline invocation.
///
/// Both fields may be absent; [`PipelineAnswer::answer_text`] and
/// [`PipelineAnswer::top_source_text`] apply the display defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineAnswer {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub source_documents: Vec<RetrievedPassage>,
}

impl PipelineAnswer {
    /// The answer, or [`NO_ANSWER_FOUND`] when the pipeline returned none.
    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().unwrap_or(NO_ANSWER_FOUND)
    }

    /// Content of the highest-ranked passage, or [`NO_SOURCE_DOCUMENT_FOUND`].
    pub fn top_source_text(&self) -> &str {
        self.source_documents
            .first()
            .map(|p| p.content.as_str())
            .unwrap_or(NO_SOURCE_DOCUMENT_FOUND)
    }

    /// Apply display defaults, producing what the page shows for a turn.
    pub fn render(&self) -> RenderedAnswer {
        RenderedAnswer {
            answer: self.answer_text().to_string(),
            top_source: self.top_source_text().to_string(),
        }
    }
}

/// What the page displays for one answered turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedAnswer {
    pub answer: String,
    pub top_source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_turn() {
        let turn = ChatTurn::pending("What is atherosclerosis?");
        assert!(turn.is_pending());
        assert_eq!(turn.answer, "");
    }

    #[test]
    fn test_begin_and_resolve_turn() {
        let mut session = ChatSession::new(Uuid::now_v7());
        assert!(session.is_empty());

        let idx = session.begin_turn("q1");
        assert_eq!(idx, 0);
        assert!(session.turns[0].is_pending());

        assert!(session.resolve_last("a1"));
        assert_eq!(session.turns, vec![ChatTurn::new("q1", "a1")]);
    }

    #[test]
    fn test_resolve_last_on_empty_session() {
        let mut session = ChatSession::new(Uuid::now_v7());
        assert!(!session.resolve_last("orphan"));
        assert!(session.is_empty());
    }

    #[test]
    fn test_answer_defaults() {
        let empty = PipelineAnswer::default();
        assert_eq!(empty.answer_text(), "No answer found.");
        assert_eq!(empty.top_source_text(), "No source document found.");
    }

    #[test]
    fn test_top_source_is_first_passage() {
        let answer = PipelineAnswer {
            answer: Some("Atherosclerosis is...".to_string()),
            source_documents: vec![
                RetrievedPassage::new("Plaque buildup..."),
                RetrievedPassage::new("Second passage"),
            ],
        };
        let rendered = answer.render();
        assert_eq!(rendered.answer, "Atherosclerosis is...");
        assert_eq!(rendered.top_source, "Plaque buildup...");
    }

    #[test]
    fn test_pipeline_answer_deserialize_missing_keys() {
        let parsed: PipelineAnswer = serde_json::from_str("{}").unwrap();
        assert!(parsed.answer.is_none());
        assert!(parsed.source_documents.is_empty());
    }

    #[test]
    fn test_passage_serialization_skips_empty_fields() {
        let json = serde_json::to_value(RetrievedPassage::new("text")).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "text" }));
    }
}
