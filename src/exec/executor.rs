// src/exec/executor.rs

//! Bounded, strictly sequential retry loop around single attempts.

use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::backend::{ProcessBackend, TokioProcessBackend};
use crate::types::{CommandSpec, ExecutionResult, RetryPolicy, TimeoutPolicy};

/// Runs a command with a per-attempt timeout and a retry policy.
///
/// Holds no state between calls; every [`Executor::run`] is independent.
#[derive(Debug, Clone, Default)]
pub struct Executor<B = TokioProcessBackend> {
    backend: B,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: ProcessBackend> Executor<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run `spec` until it produces a status outside the retry-trigger set or
    /// `1 + max_retries` attempts have been made.
    ///
    /// Two deliberate quirks:
    /// - a timed-out attempt is always retried while attempts remain, even
    ///   when the caller's trigger set is empty;
    /// - `retry.delay` is slept after every attempt, the last one included.
    ///
    /// An exhausted budget is not an error: the last attempt's result is
    /// returned as is. Spawn and wait failures abort immediately.
    pub async fn run(
        &self,
        spec: &CommandSpec,
        timeout: &TimeoutPolicy,
        retry: &RetryPolicy,
    ) -> Result<ExecutionResult> {
        let triggers = retry.effective_triggers();
        let max_attempts = retry.max_attempts();
        let mut attempt = 1;

        loop {
            let result = self.backend.run_attempt(spec, timeout, attempt).await?;

            if !retry.delay.is_zero() {
                debug!(
                    attempt,
                    delay_ms = retry.delay.as_millis() as u64,
                    "sleeping after attempt"
                );
                tokio::time::sleep(retry.delay).await;
            }

            if !triggers.contains(&result.exit_code) {
                return Ok(result);
            }

            if attempt >= max_attempts {
                info!(
                    program = %spec.program(),
                    attempts = attempt,
                    exit_code = result.exit_code,
                    "retry budget exhausted; returning last result"
                );
                return Ok(result);
            }

            info!(
                program = %spec.program(),
                attempt,
                exit_code = result.exit_code,
                timed_out = result.timed_out(),
                "exit status is retry-triggering; retrying"
            );
            attempt += 1;
        }
    }
}

/// Convenience wrapper: [`Executor::run`] on a fresh executor backed by real processes.
pub async fn run(
    spec: &CommandSpec,
    timeout: &TimeoutPolicy,
    retry: &RetryPolicy,
) -> Result<ExecutionResult> {
    Executor::new().run(spec, timeout, retry).await
}
