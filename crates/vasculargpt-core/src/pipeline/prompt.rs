//! Prompt construction for the answering pipeline.
//!
//! Passages are "stuffed" into the system prompt; history turns become
//! alternating user/assistant messages ahead of the question.

use vasculargpt_types::chat::{ChatTurn, RetrievedPassage};
use vasculargpt_types::llm::Message;

const QA_SYSTEM_PREAMBLE: &str = "Use the following pieces of context to answer the user's question.\n\
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\
----------------";

const CONDENSE_INSTRUCTIONS: &str = "Given the following conversation and a follow up question, \
rephrase the follow up question to be a standalone question, in its original language.";

/// System prompt embedding the retrieved passages as context.
pub fn qa_system_prompt(passages: &[RetrievedPassage]) -> String {
    let context = passages
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{QA_SYSTEM_PREAMBLE}\n{context}")
}

/// Turns that carry an answer, in order.
///
/// A pending turn has nothing for the model to condition on, so it is left
/// out of the rendered conversation.
pub fn answered_turns(history: &[ChatTurn]) -> impl Iterator<Item = &ChatTurn> {
    history.iter().filter(|t| !t.is_pending())
}

/// Conversation messages for the QA request: history, then the question.
pub fn qa_messages(question: &str, history: &[ChatTurn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 1);
    for turn in answered_turns(history) {
        messages.push(Message::user(turn.question.clone()));
        messages.push(Message::assistant(turn.answer.clone()));
    }
    messages.push(Message::user(question));
    messages
}

/// Plain-text transcript used by the condense step.
pub fn format_history(history: &[ChatTurn]) -> String {
    answered_turns(history)
        .map(|t| format!("Human: {}\nAssistant: {}", t.question, t.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking the model to rewrite a follow-up into a standalone question.
pub fn condense_prompt(question: &str, history: &[ChatTurn]) -> String {
    format!(
        "{CONDENSE_INSTRUCTIONS}\n\nChat History:\n{}\nFollow Up Input: {question}\nStandalone question:",
        format_history(history)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vasculargpt_types::llm::MessageRole;

    #[test]
    fn test_system_prompt_contains_passages_in_order() {
        let passages = vec![
            RetrievedPassage::new("Plaque buildup..."),
            RetrievedPassage::new("Statins lower LDL."),
        ];
        let prompt = qa_system_prompt(&passages);
        let first = prompt.find("Plaque buildup...").unwrap();
        let second = prompt.find("Statins lower LDL.").unwrap();
        assert!(prompt.starts_with("Use the following pieces of context"));
        assert!(first < second);
    }

    #[test]
    fn test_qa_messages_skip_pending_turn() {
        let history = vec![
            ChatTurn::new("What is atherosclerosis?", "Atherosclerosis is..."),
            ChatTurn::pending("And how is it treated?"),
        ];
        let messages = qa_messages("And how is it treated?", &history);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "What is atherosclerosis?");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[2].content, "And how is it treated?");
    }

    #[test]
    fn test_qa_messages_first_turn() {
        let history = vec![ChatTurn::pending("What is atherosclerosis?")];
        let messages = qa_messages("What is atherosclerosis?", &history);
        assert_eq!(messages, vec![Message::user("What is atherosclerosis?")]);
    }

    #[test]
    fn test_condense_prompt_format() {
        let history = vec![ChatTurn::new("What is PAD?", "Peripheral artery disease.")];
        let prompt = condense_prompt("How is it diagnosed?", &history);
        assert!(prompt.contains("Human: What is PAD?\nAssistant: Peripheral artery disease."));
        assert!(prompt.ends_with("Follow Up Input: How is it diagnosed?\nStandalone question:"));
    }
}
