//! One-shot `ask` command.

use std::io::Write;

use uuid::Uuid;

use vasculargpt_core::pipeline::AnswerPipeline;
use vasculargpt_types::chat::ChatSession;

use crate::state::AppState;

use super::render::{answer_json, write_answer};

/// Submit `question` against a fresh in-memory session and print the result.
///
/// Pipeline failures propagate, giving a non-zero exit status. `quiet`
/// suppresses the progress and notice lines but never the answer.
pub async fn ask(state: &AppState, question: &str, json: bool, quiet: bool) -> anyhow::Result<()> {
    run_ask(
        state,
        question,
        json,
        quiet,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

async fn run_ask<P: AnswerPipeline>(
    state: &AppState<P>,
    question: &str,
    json: bool,
    quiet: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<()> {
    let mut session = ChatSession::new(Uuid::now_v7());
    let chatty = !json && !quiet;

    if chatty && !question.is_empty() {
        writeln!(err, "{}", console::style("Processing your question...").dim())?;
    }

    let rendered = state.controller.submit(&mut session, question).await?;

    if json {
        writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(&answer_json(question, rendered.as_ref()))?
        )?;
        return Ok(());
    }

    match rendered {
        Some(rendered) => write_answer(out, &rendered)?,
        None if chatty => {
            writeln!(err, "{}", console::style("Empty question; nothing submitted.").dim())?
        }
        None => {}
    }
    Ok(())
}
