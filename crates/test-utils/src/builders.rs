#![allow(dead_code)]

use std::time::Duration;

use chrono::{Local, TimeZone};
use runguard::audit::LogEntry;
use runguard::types::{CommandSpec, ExecutionResult, RetryPolicy};

/// `/bin/sh -c <script>` as a `CommandSpec`.
pub fn sh(script: &str) -> CommandSpec {
    CommandSpec::new(["/bin/sh", "-c", script]).expect("valid shell command")
}

/// Builder for `RetryPolicy` to simplify test setup.
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retry_on(mut self, code: i32) -> Self {
        self.policy.retry_on.insert(code);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.policy.max_retries = n;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.policy.delay = delay;
        self
    }

    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}

/// Builder for `LogEntry` with a fixed timestamp, so rendered blocks are
/// reproducible.
#[derive(Debug)]
pub struct LogEntryBuilder {
    entry: LogEntry,
}

impl LogEntryBuilder {
    pub fn new(argv: &[&str]) -> Self {
        Self {
            entry: LogEntry {
                timestamp: Local
                    .with_ymd_and_hms(2024, 5, 17, 9, 30, 0)
                    .single()
                    .expect("unambiguous local time"),
                username: "johndoe".to_string(),
                action: "SCP Files to remote server".to_string(),
                server: "linuxhost01.acme.com".to_string(),
                command: CommandSpec::new(argv.iter().copied()).expect("valid command"),
                result: ExecutionResult {
                    stdout: String::new(),
                    stderr: String::new(),
                    exit_code: 0,
                    attempt: 1,
                },
            },
        }
    }

    pub fn action(mut self, action: &str) -> Self {
        self.entry.action = action.to_string();
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.entry.result.exit_code = code;
        self
    }

    pub fn stdout(mut self, text: &str) -> Self {
        self.entry.result.stdout = text.to_string();
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.entry.result.stderr = text.to_string();
        self
    }

    pub fn build(self) -> LogEntry {
        self.entry
    }
}
