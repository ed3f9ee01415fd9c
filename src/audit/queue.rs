// src/audit/queue.rs

//! Single-writer queue for in-process callers.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::audit::entry::LogEntry;
use crate::audit::writer::{append, resolve_log_path};
use crate::errors::Result;

/// Spawn a task that appends every entry received on `rx`, in order.
///
/// The log path is validated up front, so a missing directory fails here
/// instead of on every entry. Write failures after that are reported via
/// `tracing` and skipped; they never reach whoever produced the entry.
///
/// The task ends once every sender is dropped, yielding the number of
/// entries successfully written.
pub fn spawn_log_writer(
    log_directory: PathBuf,
    log_file_name: Option<String>,
    mut rx: mpsc::Receiver<LogEntry>,
) -> Result<JoinHandle<usize>> {
    let path = resolve_log_path(&log_directory, log_file_name.as_deref())?;

    Ok(tokio::spawn(async move {
        info!(path = %path.display(), "execution log writer started");
        let mut written = 0;

        while let Some(entry) = rx.recv().await {
            match append(&entry, &log_directory, log_file_name.as_deref()) {
                Ok(()) => written += 1,
                Err(e) => warn!(error = %e, "failed to append execution log entry"),
            }
        }

        info!(written, "execution log writer finished (channel closed)");
        written
    }))
}
