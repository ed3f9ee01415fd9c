// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The executor's retry loop talks to a `ProcessBackend` instead of spawning
//! processes itself. Production code uses [`TokioProcessBackend`]; tests can
//! supply a backend that returns scripted results without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::types::{CommandSpec, ExecutionResult, TimeoutPolicy};

use super::attempt::run_attempt;

/// Runs exactly one attempt of a command.
pub trait ProcessBackend: Send + Sync {
    /// Spawn `spec`, wait for it under `timeout`, and report the outcome.
    ///
    /// A timeout is reported as a normal result carrying
    /// [`TIMEOUT_EXIT_CODE`](crate::types::TIMEOUT_EXIT_CODE), not as an error.
    fn run_attempt<'a>(
        &'a self,
        spec: &'a CommandSpec,
        timeout: &'a TimeoutPolicy,
        attempt: u32,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>>;
}

/// Backend that spawns real OS processes via `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessBackend;

impl ProcessBackend for TokioProcessBackend {
    fn run_attempt<'a>(
        &'a self,
        spec: &'a CommandSpec,
        timeout: &'a TimeoutPolicy,
        attempt: u32,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>> {
        Box::pin(run_attempt(spec, timeout, attempt))
    }
}
