// src/exec/watchdog.rs

//! Single-shot watchdog timer.
//!
//! The watchdog is a Tokio task that races a `oneshot` cancel channel against
//! a sleep. Whichever branch the task's `select!` takes is the only outcome
//! that ever exists for it:
//!
//! - cancelled first: the timer never fires and no signal is sent;
//! - deadline first: the process receives `SIGTERM` and the outcome is
//!   [`WatchdogOutcome::Fired`], even if a cancel request arrives afterwards.
//!
//! Dropping a [`Watchdog`] without disarming it closes the cancel channel,
//! which the task treats as a cancellation.
//!
//! The pid of a reaped child can be handed to an unrelated process. The owner
//! marks the [`ReapedFlag`] as soon as its wait returns, and a deadline that
//! fires after that still reports `Fired` but sends nothing. The check and the
//! `kill(2)` are not atomic, so a reap landing between the two can still see
//! the signal go to a recycled pid. That window is a single syscall wide.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogOutcome {
    /// Disarmed (or dropped) before the deadline.
    Cancelled,
    /// Deadline reached; the termination signal has been sent.
    Fired,
}

/// Set once the watched process has been reaped.
#[derive(Debug, Clone, Default)]
pub struct ReapedFlag(Arc<AtomicBool>);

impl ReapedFlag {
    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_marked(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct Watchdog {
    cancel: Option<oneshot::Sender<()>>,
    reaped: ReapedFlag,
    handle: JoinHandle<WatchdogOutcome>,
    outcome: Option<WatchdogOutcome>,
}

impl Watchdog {
    /// Start a timer that sends `SIGTERM` to `pid` once `limit` elapses.
    pub fn arm(pid: u32, limit: Duration) -> Self {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let reaped = ReapedFlag::default();
        let reaped_in_task = reaped.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = cancel_rx => {
                    debug!(pid, "watchdog cancelled before deadline");
                    WatchdogOutcome::Cancelled
                }

                _ = tokio::time::sleep(limit) => {
                    if reaped_in_task.is_marked() {
                        debug!(pid, "watchdog deadline reached after process was reaped; not signalling");
                    } else {
                        warn!(
                            pid,
                            timeout_ms = limit.as_millis() as u64,
                            "watchdog deadline reached; terminating process"
                        );
                        terminate(pid);
                    }
                    WatchdogOutcome::Fired
                }
            }
        });

        Self {
            cancel: Some(cancel_tx),
            reaped,
            handle,
            outcome: None,
        }
    }

    /// Handle the owner marks once it has reaped the process.
    pub fn reaped_flag(&self) -> ReapedFlag {
        self.reaped.clone()
    }

    /// Wait until the watchdog has resolved one way or the other.
    ///
    /// Cancel-safe: if this future is dropped before completion it can be
    /// polled again later (e.g. from [`Watchdog::disarm`]).
    pub async fn resolved(&mut self) -> WatchdogOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        let outcome = match (&mut self.handle).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "watchdog task did not complete; treating as cancelled");
                WatchdogOutcome::Cancelled
            }
        };
        self.outcome = Some(outcome);
        outcome
    }

    /// Request cancellation and return the outcome that actually took effect.
    ///
    /// If the deadline won the race, this still reports `Fired`.
    pub async fn disarm(mut self) -> WatchdogOutcome {
        if let Some(cancel) = self.cancel.take() {
            // Err means the task already finished; its outcome stands.
            let _ = cancel.send(());
        }
        self.resolved().await
    }
}

#[cfg(unix)]
fn terminate(pid: u32) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        warn!(pid, "pid out of range; cannot signal");
        return;
    };

    if let Err(e) = kill(Pid::from_raw(raw), Signal::SIGTERM) {
        warn!(pid, error = %e, "failed to send SIGTERM");
    }
}

#[cfg(not(unix))]
fn terminate(pid: u32) {
    warn!(pid, "termination by pid is only supported on unix");
}
