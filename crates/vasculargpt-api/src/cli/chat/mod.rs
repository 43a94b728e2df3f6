//! Interactive terminal chat over one in-memory session.
//!
//! Every line goes through the same session controller the web page uses,
//! so follow-up questions see the earlier turns.

pub mod input;

use std::io::Write;

use console::style;
use uuid::Uuid;

use vasculargpt_types::chat::ChatSession;

use crate::state::AppState;

use super::render::write_answer;
use input::{ChatInput, InputEvent};

/// What the loop should do with a line of input.
#[derive(Debug, PartialEq, Eq)]
enum LineAction<'a> {
    Quit,
    Submit(&'a str),
}

fn classify(line: &str) -> LineAction<'_> {
    match line.trim() {
        "/quit" | "/exit" => LineAction::Quit,
        _ => LineAction::Submit(line.trim_end_matches(['\r', '\n'])),
    }
}

/// Run the REPL until EOF, Ctrl+C or `/quit`.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let page = &state.config.page;
    let mut session = ChatSession::new(Uuid::now_v7());

    let (mut input, mut stdout) = ChatInput::new(format!("{} ", style("you>").bold()))?;

    writeln!(stdout, "\n  {}", style(&page.title).bold().cyan())?;
    writeln!(stdout, "  {}", style(&page.description).dim())?;
    writeln!(stdout, "  {}\n", style("Type /quit or press Ctrl+D to leave.").dim())?;

    loop {
        let line = match input.read_line().await {
            InputEvent::Line(line) => line,
            InputEvent::Eof | InputEvent::Interrupted => break,
        };

        let question = match classify(&line) {
            LineAction::Quit => break,
            LineAction::Submit(question) => question,
        };
        if question.is_empty() {
            continue;
        }

        writeln!(stdout, "{}", style("Processing your question...").dim())?;

        match state.controller.submit(&mut session, question).await {
            Ok(Some(rendered)) => {
                let mut buf = Vec::new();
                write_answer(&mut buf, &rendered)?;
                stdout.write_all(&buf)?;
            }
            Ok(None) => {}
            Err(e) => {
                writeln!(stdout, "{} {e}", style("Error:").bold().red())?;
            }
        }
    }

    input.flush();
    tracing::info!(session_id = %session.id, turns = session.len(), "Chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("/quit"), LineAction::Quit);
        assert_eq!(classify("  /exit "), LineAction::Quit);
        assert_eq!(
            classify("What is an aneurysm?\r\n"),
            LineAction::Submit("What is an aneurysm?")
        );
        assert_eq!(classify(""), LineAction::Submit(""));
    }
}
