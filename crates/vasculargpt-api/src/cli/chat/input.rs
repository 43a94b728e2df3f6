//! Async readline input for the chat loop.
//!
//! Wraps `rustyline_async::Readline` to handle EOF (Ctrl+D) and interrupt
//! (Ctrl+C).

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line, untrimmed.
    Line(String),
    Eof,
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the input handler and a `SharedWriter` for printing without
    /// clobbering the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                self.rl.add_history_entry(line.clone());
                InputEvent::Line(line)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    /// Restore the terminal and flush pending output.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
