//! Terminal rendering of an agent's event stream

use medagent_core::AgentEvent;
use serde_json::Value;
use std::io::{self, Write};

/// Writes streamed agent events to `W` as they arrive
///
/// Text deltas are flushed immediately so partial answers show up live.
/// Tool calls get a line of their own.
pub struct ResponsePrinter<W: Write> {
    out: W,
    at_line_start: bool,
}

impl<W: Write> ResponsePrinter<W> {
    /// Wrap a writer
    pub fn new(out: W) -> Self {
        Self {
            out,
            at_line_start: true,
        }
    }

    /// Render a single event
    pub fn handle(&mut self, event: &AgentEvent) -> io::Result<()> {
        match event {
            AgentEvent::TextDelta(text) => {
                if text.is_empty() {
                    return Ok(());
                }
                self.out.write_all(text.as_bytes())?;
                self.at_line_start = text.ends_with('\n');
            }
            AgentEvent::ToolCallStarted { name, arguments, .. } => {
                self.start_line()?;
                writeln!(self.out, "Running: {}", format_call(name, arguments))?;
                self.at_line_start = true;
            }
            AgentEvent::ToolCallCompleted {
                name,
                error: Some(error),
                ..
            } => {
                self.start_line()?;
                writeln!(self.out, "Tool {name} failed: {error}")?;
                self.at_line_start = true;
            }
            AgentEvent::ToolCallCompleted { .. } => {}
            AgentEvent::Completed { .. } => {
                self.start_line()?;
            }
        }
        self.out.flush()
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn start_line(&mut self) -> io::Result<()> {
        if !self.at_line_start {
            self.out.write_all(b"\n")?;
            self.at_line_start = true;
        }
        Ok(())
    }
}

fn format_call(name: &str, arguments: &Value) -> String {
    let args = match arguments {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key}={s}"),
                other => format!("{key}={other}"),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    format!("{name}({args})")
}
