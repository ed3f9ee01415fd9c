use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use runguard::errors::{Result, RunguardError};
use runguard::exec::ProcessBackend;
use runguard::types::{CommandSpec, ExecutionResult, TimeoutPolicy};

/// A fake backend that:
/// - records the attempt number of every call
/// - answers with the next scripted exit code (the last one repeats forever)
/// - never spawns a process.
#[derive(Debug, Clone)]
pub struct ScriptedBackend {
    script: Arc<Vec<i32>>,
    attempts: Arc<Mutex<Vec<u32>>>,
    fail_spawn: bool,
}

impl ScriptedBackend {
    pub fn new(script: impl Into<Vec<i32>>) -> Self {
        let script = script.into();
        assert!(!script.is_empty(), "script needs at least one exit code");
        Self {
            script: Arc::new(script),
            attempts: Arc::new(Mutex::new(Vec::new())),
            fail_spawn: false,
        }
    }

    /// Backend whose every attempt fails to spawn.
    pub fn failing_spawn() -> Self {
        Self {
            fail_spawn: true,
            ..Self::new([0])
        }
    }

    /// Attempt numbers seen so far, in call order.
    pub fn attempts(&self) -> Vec<u32> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

impl ProcessBackend for ScriptedBackend {
    fn run_attempt<'a>(
        &'a self,
        spec: &'a CommandSpec,
        _timeout: &'a TimeoutPolicy,
        attempt: u32,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>> {
        Box::pin(async move {
            let index = {
                let mut guard = self.attempts.lock().unwrap();
                guard.push(attempt);
                guard.len() - 1
            };

            if self.fail_spawn {
                return Err(RunguardError::SpawnFailed {
                    program: spec.program().to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted"),
                });
            }

            let exit_code = self
                .script
                .get(index)
                .or_else(|| self.script.last())
                .copied()
                .unwrap_or(0);

            Ok(ExecutionResult {
                stdout: format!("attempt {attempt}\n"),
                stderr: String::new(),
                exit_code,
                attempt,
            })
        })
    }
}
