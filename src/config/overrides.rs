// src/config/overrides.rs

use crate::cli::CliArgs;
use crate::config::model::{JobFile, LogSettings};
use crate::errors::{Result, RunguardError};
use crate::types::{CommandSpec, RetryPolicy, TimeoutPolicy};

/// Fully resolved job: job file defaults with CLI flags applied.
#[derive(Debug, Clone)]
pub struct Job {
    pub command: CommandSpec,
    pub retry: RetryPolicy,
    pub timeout: TimeoutPolicy,
    pub log: LogSettings,
}

/// Apply `args` on top of `file`, field by field.
///
/// Command tokens given after `--` replace `[command].argv`; the job file's
/// `env` is kept either way. A non-empty `--retry-on` list replaces
/// `[retry].on_exit_codes` rather than extending it.
pub fn resolve_job(file: JobFile, args: &CliArgs) -> Result<Job> {
    let command = match (args.command.is_empty(), file.command) {
        (false, from_file) => {
            let spec = CommandSpec::new(args.command.iter().cloned())?;
            match from_file.as_ref().and_then(CommandSpec::env) {
                Some(env) => spec.with_env(env.clone()),
                None => spec,
            }
        }
        (true, Some(spec)) => spec,
        (true, None) => {
            return Err(RunguardError::InvalidCommand(
                "no command given: pass it after `--` or set [command].argv".to_string(),
            ));
        }
    };

    let mut retry = file.retry;
    if !args.retry_on.is_empty() {
        retry.retry_on = args.retry_on.iter().copied().collect();
    }
    if let Some(n) = args.retries {
        retry.max_retries = n;
    }
    if let Some(delay) = args.delay {
        retry.delay = delay;
    }

    let mut timeout = file.timeout;
    if let Some(limit) = args.timeout {
        timeout.limit = Some(limit);
    }
    if let Some(grace) = args.kill_after {
        timeout.kill_after = Some(grace);
    }
    if timeout.kill_after.is_some() && timeout.effective_limit().is_none() {
        return Err(RunguardError::ConfigError(
            "--kill-after requires a nonzero timeout".to_string(),
        ));
    }

    let mut log = file.log;
    if let Some(dir) = &args.log_dir {
        if dir.as_os_str().is_empty() {
            return Err(RunguardError::ConfigError(
                "--log-dir must not be empty".to_string(),
            ));
        }
        log.directory = Some(dir.clone());
    }
    override_string(&mut log.file_name, &args.log_file);
    override_string(&mut log.action, &args.action);
    override_string(&mut log.server, &args.server);
    override_string(&mut log.username, &args.username);

    Ok(Job {
        command,
        retry,
        timeout,
        log,
    })
}

fn override_string(slot: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value {
        *slot = Some(v.clone());
    }
}
