// src/audit/entry.rs

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::types::{CommandSpec, ExecutionResult};

const MAJOR_RULE: &str = "===============================================================";
const MINOR_RULE: &str = "---------------------------------------------------------------";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
/// Used when the sub-second part is zero: no trailing `.000000`.
const WHOLE_SECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything recorded about one execution.
///
/// Purely descriptive; nothing here is validated beyond being renderable.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub username: String,
    pub action: String,
    pub server: String,
    pub command: CommandSpec,
    pub result: ExecutionResult,
}

impl LogEntry {
    /// Entry stamped with the current local time.
    pub fn now(
        username: impl Into<String>,
        action: impl Into<String>,
        server: impl Into<String>,
        command: CommandSpec,
        result: ExecutionResult,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            username: username.into(),
            action: action.into(),
            server: server.into(),
            command,
            result,
        }
    }

    /// Render the block exactly as it is appended to the log file.
    ///
    /// Label text and field order are read by downstream parsers; keep them
    /// stable.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{MAJOR_RULE}");
        let _ = writeln!(out, "{MINOR_RULE}");
        let _ = writeln!(out, "DATETIME:\t\t{}", self.rendered_timestamp());
        let _ = writeln!(out, "USERNAME:\t\t{}", self.username);
        let _ = writeln!(out, "ACTION:\t\t\t{}", self.action);
        let _ = writeln!(out, "SERVER:\t{}", self.server);
        let _ = writeln!(out, "COMMAND:\t\t{}", self.command);
        let _ = writeln!(out, "RETURN CODE:\t{}", self.result.exit_code);
        out.push_str("STANDARD OUT:\n");
        push_stream(&mut out, &self.result.stdout);
        out.push_str("STANDARD ERROR:\n");
        push_stream(&mut out, &self.result.stderr);
        let _ = writeln!(out, "{MINOR_RULE}");
        let _ = writeln!(out, "{MAJOR_RULE}");
        out.push('\n');
        out
    }

    fn rendered_timestamp(&self) -> String {
        let format = if self.timestamp.timestamp_subsec_micros() == 0 {
            WHOLE_SECOND_FORMAT
        } else {
            TIMESTAMP_FORMAT
        };
        self.timestamp.format(format).to_string()
    }
}

/// Captured text goes in verbatim; a newline is only added so the next label
/// starts on its own line.
fn push_stream(out: &mut String, text: &str) {
    out.push_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        out.push('\n');
    }
}
