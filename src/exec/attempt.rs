// src/exec/attempt.rs

//! One spawn-and-wait cycle of the target process.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{Result, RunguardError};
use crate::exec::watchdog::{Watchdog, WatchdogOutcome};
use crate::types::{timeout_message, CommandSpec, ExecutionResult, TimeoutPolicy, TIMEOUT_EXIT_CODE};

/// How long to keep draining pipes after a timed-out child is gone.
///
/// Grandchildren can hold the pipes open long after the direct child dies.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

enum Completion {
    Exited(ExitStatus),
    TimedOut,
}

/// Spawn `spec` once, capture both output streams, and apply the timeout.
///
/// The limit covers the whole attempt: the child's exit *and* EOF on both
/// pipes. A descendant that keeps stdout open past the limit times the
/// attempt out even if the direct child already exited.
pub async fn run_attempt(
    spec: &CommandSpec,
    timeout: &TimeoutPolicy,
    attempt: u32,
) -> Result<ExecutionResult> {
    info!(program = %spec.program(), attempt, cmd = %spec, "starting attempt");

    let mut cmd = Command::new(spec.program());
    cmd.args(spec.args())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(env) = spec.env() {
        cmd.env_clear().envs(env);
    }

    let mut child = cmd.spawn().map_err(|source| RunguardError::SpawnFailed {
        program: spec.program().to_string(),
        source,
    })?;

    let mut stdout = Capture::spawn(child.stdout.take());
    let mut stderr = Capture::spawn(child.stderr.take());

    let completion = match (timeout.effective_limit(), child.id()) {
        (Some(limit), Some(pid)) => {
            let watchdog = Watchdog::arm(pid, limit);
            wait_with_watchdog(
                &mut child,
                spec,
                watchdog,
                timeout.kill_after,
                &mut stdout,
                &mut stderr,
            )
            .await?
        }
        // No limit, or the child was already reaped and has no pid.
        _ => {
            let status = wait(&mut child, spec).await?;
            stdout.finish().await;
            stderr.finish().await;
            Completion::Exited(status)
        }
    };

    let result = match completion {
        Completion::Exited(status) => {
            let exit_code = exit_code(status);
            info!(program = %spec.program(), attempt, exit_code, "attempt finished");
            ExecutionResult {
                stdout: stdout.into_string(),
                stderr: stderr.into_string(),
                exit_code,
                attempt,
            }
        }
        Completion::TimedOut => {
            // Only reachable with a limit configured.
            let limit = timeout.effective_limit().unwrap_or_default();
            info!(
                program = %spec.program(),
                attempt,
                exit_code = TIMEOUT_EXIT_CODE,
                "attempt timed out"
            );
            stdout.abort();
            ExecutionResult {
                stdout: timeout_message(limit),
                stderr: stderr.finish_within(OUTPUT_DRAIN_GRACE).await,
                exit_code: TIMEOUT_EXIT_CODE,
                attempt,
            }
        }
    };

    Ok(result)
}

/// Race "child exited and both pipes closed" against the watchdog.
async fn wait_with_watchdog(
    child: &mut Child,
    spec: &CommandSpec,
    mut watchdog: Watchdog,
    kill_after: Option<Duration>,
    stdout: &mut Capture,
    stderr: &mut Capture,
) -> Result<Completion> {
    enum Race {
        Finished(std::io::Result<ExitStatus>),
        Watchdog(WatchdogOutcome),
    }

    let reaped = watchdog.reaped_flag();
    let finished = async {
        let status = child.wait().await?;
        // The pid may be recycled from here on.
        reaped.mark();
        stdout.finish().await;
        stderr.finish().await;
        Ok::<_, std::io::Error>(status)
    };

    let race = tokio::select! {
        biased;
        done = finished => Race::Finished(done),
        outcome = watchdog.resolved() => Race::Watchdog(outcome),
    };

    match race {
        Race::Finished(done) => {
            let status = done.map_err(|source| wait_error(spec, source))?;
            // The deadline may have passed between the finish and this call;
            // whatever the watchdog resolved to is authoritative.
            match watchdog.disarm().await {
                WatchdogOutcome::Cancelled => Ok(Completion::Exited(status)),
                WatchdogOutcome::Fired => Ok(Completion::TimedOut),
            }
        }
        Race::Watchdog(WatchdogOutcome::Fired) => {
            // Returns at once when the child is already reaped and only a
            // descendant still holds the pipes.
            reap_after_signal(child, spec, kill_after).await?;
            Ok(Completion::TimedOut)
        }
        Race::Watchdog(WatchdogOutcome::Cancelled) => {
            // Watchdog task died without firing; fall back to an unbounded wait.
            let status = wait(child, spec).await?;
            stdout.finish().await;
            stderr.finish().await;
            Ok(Completion::Exited(status))
        }
    }
}

async fn reap_after_signal(
    child: &mut Child,
    spec: &CommandSpec,
    kill_after: Option<Duration>,
) -> Result<()> {
    let Some(grace) = kill_after else {
        wait(child, spec).await?;
        return Ok(());
    };

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(status) => {
            status.map_err(|source| wait_error(spec, source))?;
        }
        Err(_) => {
            warn!(
                program = %spec.program(),
                grace_ms = grace.as_millis() as u64,
                "process ignored termination signal; killing"
            );
            child
                .kill()
                .await
                .map_err(|source| wait_error(spec, source))?;
        }
    }
    Ok(())
}

async fn wait(child: &mut Child, spec: &CommandSpec) -> Result<ExitStatus> {
    child
        .wait()
        .await
        .map_err(|source| wait_error(spec, source))
}

fn wait_error(spec: &CommandSpec, source: std::io::Error) -> RunguardError {
    RunguardError::WaitFailed {
        program: spec.program().to_string(),
        source,
    }
}

/// A pipe drained to EOF by its own task.
struct Capture {
    task: JoinHandle<Vec<u8>>,
    bytes: Option<Vec<u8>>,
}

impl Capture {
    fn spawn<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut pipe) = pipe {
                if let Err(e) = pipe.read_to_end(&mut buf).await {
                    debug!(error = %e, "error reading child output");
                }
            }
            buf
        });
        Self { task, bytes: None }
    }

    /// Wait for EOF. Cancel-safe, and a no-op once the bytes are in.
    async fn finish(&mut self) {
        if self.bytes.is_none() {
            self.bytes = Some((&mut self.task).await.unwrap_or_default());
        }
    }

    /// Like [`Capture::finish`], but give up (and drop the output) after `grace`.
    async fn finish_within(mut self, grace: Duration) -> String {
        if tokio::time::timeout(grace, self.finish()).await.is_err() {
            debug!("output pipe still open after grace period; dropping it");
            self.task.abort();
        }
        self.into_string()
    }

    fn abort(&self) {
        self.task.abort();
    }

    fn into_string(self) -> String {
        String::from_utf8_lossy(&self.bytes.unwrap_or_default()).into_owned()
    }
}

/// Real exit code, or the negated signal number for a signal death.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
