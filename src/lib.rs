// src/lib.rs

pub mod audit;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use tracing::{debug, info, warn};

use crate::audit::LogEntry;
use crate::cli::CliArgs;
use crate::config::{load_and_validate, resolve_job, Job, JobFile};
use crate::errors::{Result, RunguardError};
use crate::exec::Executor;
use crate::types::ExecutionResult;

/// Exit status `runguard` uses when the final attempt timed out.
pub const TIMED_OUT_PROCESS_EXIT: i32 = 124;

/// What one `runguard` invocation produced.
///
/// `audit_error` is kept apart from `result` so a failed log write can never
/// hide or alter the command's outcome.
#[derive(Debug)]
pub struct Report {
    pub result: ExecutionResult,
    pub audit_error: Option<RunguardError>,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job file loading + CLI overrides
/// - the executor (timeout + retries)
/// - the execution log
///
/// Returns `None` for `--dry-run`.
pub async fn run(args: CliArgs) -> Result<Option<Report>> {
    let file = match &args.config {
        Some(path) => load_and_validate(path)?,
        None => JobFile::default(),
    };
    let job = resolve_job(file, &args)?;

    if args.dry_run {
        print_dry_run(&job);
        return Ok(None);
    }

    let result = Executor::new()
        .run(&job.command, &job.timeout, &job.retry)
        .await?;

    info!(
        exit_code = result.exit_code,
        attempts = result.attempt,
        timed_out = result.timed_out(),
        "command finished"
    );

    let audit_error = write_audit_entry(&job, &result).err();
    Ok(Some(Report {
        result,
        audit_error,
    }))
}

/// Append the execution log entry if a log directory is configured.
fn write_audit_entry(job: &Job, result: &ExecutionResult) -> Result<()> {
    let Some(dir) = &job.log.directory else {
        debug!("no log directory configured; skipping execution log");
        return Ok(());
    };

    let entry = LogEntry::now(
        job.log.username.clone().unwrap_or_else(current_username),
        job.log.action.clone().unwrap_or_default(),
        job.log.server.clone().unwrap_or_default(),
        job.command.clone(),
        result.clone(),
    );

    audit::append(&entry, dir, job.log.file_name.as_deref()).inspect_err(|e| {
        warn!(error = %e, "failed to append execution log entry");
    })
}

fn current_username() -> String {
    ["USER", "LOGNAME", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_default()
}

/// Map a final result onto a process exit status for the `runguard` binary.
///
/// - `0` stays `0`;
/// - real codes `1..=255` pass through;
/// - a timeout becomes [`TIMED_OUT_PROCESS_EXIT`];
/// - anything else (signal deaths) becomes `1`.
pub fn process_exit_code(result: &ExecutionResult) -> i32 {
    match result.exit_code {
        _ if result.timed_out() => TIMED_OUT_PROCESS_EXIT,
        code @ 0..=255 => code,
        _ => 1,
    }
}

/// Simple dry-run output: print the resolved job.
fn print_dry_run(job: &Job) {
    println!("runguard dry-run");
    println!("  command: {}", job.command);
    if let Some(env) = job.command.env() {
        println!("  env (replaces inherited): {:?}", env.keys().collect::<Vec<_>>());
    }
    println!("  retry.on_exit_codes = {:?}", job.retry.retry_on);
    println!("  retry.max_retries = {}", job.retry.max_retries);
    println!("  retry.delay = {:?}", job.retry.delay);
    match job.timeout.effective_limit() {
        Some(limit) => println!("  timeout.limit = {limit:?}"),
        None => println!("  timeout.limit = none"),
    }
    if let Some(grace) = job.timeout.kill_after {
        println!("  timeout.kill_after = {grace:?}");
    }
    match &job.log.directory {
        Some(dir) => match audit::resolve_log_path(dir, job.log.file_name.as_deref()) {
            Ok(path) => println!("  log: {}", path.display()),
            Err(e) => println!("  log: invalid ({e})"),
        },
        None => println!("  log: disabled"),
    }

    debug!("dry-run complete (no execution)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(exit_code: i32) -> ExecutionResult {
        ExecutionResult {
            stdout: String::new(),
            stderr: String::new(),
            exit_code,
            attempt: 1,
        }
    }

    #[test]
    fn exit_code_mapping() {
        assert_eq!(process_exit_code(&result(0)), 0);
        assert_eq!(process_exit_code(&result(2)), 2);
        assert_eq!(process_exit_code(&result(255)), 255);
        assert_eq!(process_exit_code(&result(-9)), 1);
        assert_eq!(
            process_exit_code(&result(types::TIMEOUT_EXIT_CODE)),
            TIMED_OUT_PROCESS_EXIT
        );
    }
}
