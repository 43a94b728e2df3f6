//! Terminal rendering of answers.

use std::io::{self, Write};

use console::style;

use vasculargpt_types::chat::RenderedAnswer;

/// Write the answer and its top source the way the page shows them.
pub fn write_answer(out: &mut impl Write, rendered: &RenderedAnswer) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style("Answer:").bold().green())?;
    writeln!(out, "{}", rendered.answer)?;
    writeln!(out)?;
    writeln!(out, "{}", style("Source (Top Document):").bold().cyan())?;
    writeln!(out, "{}", rendered.top_source)?;
    writeln!(out)?;
    Ok(())
}

/// JSON form used by `--json`.
pub fn answer_json(question: &str, rendered: Option<&RenderedAnswer>) -> serde_json::Value {
    serde_json::json!({
        "question": question,
        "submitted": rendered.is_some(),
        "answer": rendered.map(|r| r.answer.as_str()),
        "top_source": rendered.map(|r| r.top_source.as_str()),
    })
}
