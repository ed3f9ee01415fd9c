// src/types.rs

//! Shared data model for the executor and the audit logger.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

use crate::errors::{Result, RunguardError};

/// Exit status reported for an attempt that the watchdog terminated.
///
/// Real exit codes are `0..=255` and signal deaths are reported as small
/// negative numbers, so this value can never collide with either.
pub const TIMEOUT_EXIT_CODE: i32 = -404;

/// The command to run: program plus arguments, and an optional environment.
///
/// When `env` is `Some`, the child sees exactly that environment and nothing
/// inherited from the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
    env: Option<BTreeMap<String, String>>,
}

impl CommandSpec {
    /// Build a spec from an ordered token list.
    ///
    /// Fails with [`RunguardError::InvalidCommand`] when the list is empty,
    /// the program token is blank, or any token contains a NUL byte.
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();

        let Some(program) = argv.first() else {
            return Err(RunguardError::InvalidCommand(
                "command token list is empty".to_string(),
            ));
        };
        if program.trim().is_empty() {
            return Err(RunguardError::InvalidCommand(
                "program token is blank".to_string(),
            ));
        }
        if let Some(bad) = argv.iter().find(|t| t.contains('\0')) {
            return Err(RunguardError::InvalidCommand(format!(
                "token {bad:?} contains a NUL byte"
            )));
        }

        Ok(Self { argv, env: None })
    }

    /// Replace the child's environment entirely with `env`.
    pub fn with_env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            env.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn env(&self) -> Option<&BTreeMap<String, String>> {
        self.env.as_ref()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.argv)
    }
}

/// Which exit statuses cause another attempt, how many extra attempts are
/// allowed, and how long to pause after each attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_on: BTreeSet<i32>,
    pub max_retries: u32,
    /// Slept after every attempt, the final one included.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new<I>(retry_on: I, max_retries: u32, delay: Duration) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        Self {
            retry_on: retry_on.into_iter().collect(),
            max_retries,
            delay,
        }
    }

    /// Total attempts the executor may make: the first one plus the retries.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// The caller's trigger set with [`TIMEOUT_EXIT_CODE`] always added.
    pub fn effective_triggers(&self) -> BTreeSet<i32> {
        let mut set = self.retry_on.clone();
        set.insert(TIMEOUT_EXIT_CODE);
        set
    }
}

/// Per-attempt wall-clock limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// `None` or zero means unbounded.
    pub limit: Option<Duration>,
    /// Force-kill the child if it is still alive this long after the
    /// watchdog's termination signal. `None` waits for the signal to work.
    pub kill_after: Option<Duration>,
}

impl TimeoutPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn after(limit: Duration) -> Self {
        Self {
            limit: Some(limit),
            kill_after: None,
        }
    }

    pub fn with_kill_after(mut self, grace: Duration) -> Self {
        self.kill_after = Some(grace);
        self
    }

    /// The limit to arm a watchdog with, if any.
    pub fn effective_limit(&self) -> Option<Duration> {
        self.limit.filter(|d| !d.is_zero())
    }
}

/// Outcome of one attempt; the last one is what `run` hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    /// 1-based index of the attempt that produced this result.
    pub attempt: u32,
}

impl ExecutionResult {
    pub fn timed_out(&self) -> bool {
        self.exit_code == TIMEOUT_EXIT_CODE
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Message placed in stdout for an attempt the watchdog killed.
pub fn timeout_message(limit: Duration) -> String {
    format!(
        "The process took too long to execute and timed out. The timeout time is {} seconds",
        format_seconds(limit)
    )
}

fn format_seconds(d: Duration) -> String {
    if d.subsec_nanos() == 0 {
        d.as_secs().to_string()
    } else {
        let s = format!("{:.3}", d.as_secs_f64());
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argv_is_invalid() {
        let err = CommandSpec::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, RunguardError::InvalidCommand(_)));
    }

    #[test]
    fn blank_program_is_invalid() {
        let err = CommandSpec::new(["  ", "x"]).unwrap_err();
        assert!(matches!(err, RunguardError::InvalidCommand(_)));
    }

    #[test]
    fn nul_in_token_is_invalid() {
        let err = CommandSpec::new(["echo", "a\0b"]).unwrap_err();
        assert!(matches!(err, RunguardError::InvalidCommand(_)));
    }

    #[test]
    fn program_and_args_split() {
        let spec = CommandSpec::new(["scp", "-o", "x"]).unwrap();
        assert_eq!(spec.program(), "scp");
        assert_eq!(spec.args(), &["-o".to_string(), "x".to_string()]);
        assert_eq!(spec.to_string(), r#"["scp", "-o", "x"]"#);
    }

    #[test]
    fn timeout_sentinel_is_always_a_trigger() {
        let policy = RetryPolicy::default();
        assert!(policy.effective_triggers().contains(&TIMEOUT_EXIT_CODE));
        assert!(policy.retry_on.is_empty());
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn zero_limit_means_unbounded() {
        assert_eq!(TimeoutPolicy::after(Duration::ZERO).effective_limit(), None);
        assert_eq!(TimeoutPolicy::unbounded().effective_limit(), None);
        assert_eq!(
            TimeoutPolicy::after(Duration::from_secs(2)).effective_limit(),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn timeout_message_names_the_limit() {
        assert!(timeout_message(Duration::from_secs(1)).ends_with("is 1 seconds"));
        assert!(timeout_message(Duration::from_millis(1500)).ends_with("is 1.5 seconds"));
    }
}
