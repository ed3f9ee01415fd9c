// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{
    CommandSection, JobFile, LogSection, LogSettings, RawJobFile, RetrySection, TimeoutSection,
};
use crate::errors::{Result, RunguardError};
use crate::types::{CommandSpec, RetryPolicy, TimeoutPolicy};

impl TryFrom<RawJobFile> for JobFile {
    type Error = RunguardError;

    fn try_from(raw: RawJobFile) -> std::result::Result<Self, Self::Error> {
        Ok(JobFile {
            command: raw.command.map(validate_command).transpose()?,
            retry: validate_retry(raw.retry)?,
            timeout: validate_timeout(raw.timeout)?,
            log: validate_log(raw.log)?,
        })
    }
}

fn validate_command(section: CommandSection) -> Result<CommandSpec> {
    let spec = CommandSpec::new(section.argv)
        .map_err(|e| RunguardError::ConfigError(format!("[command].argv: {e}")))?;

    Ok(match section.env {
        Some(env) => spec.with_env(env),
        None => spec,
    })
}

fn validate_retry(section: RetrySection) -> Result<RetryPolicy> {
    let delay = parse_optional("[retry].delay", section.delay.as_deref())?.unwrap_or_default();
    Ok(RetryPolicy::new(
        section.on_exit_codes,
        section.max_retries,
        delay,
    ))
}

fn validate_timeout(section: TimeoutSection) -> Result<TimeoutPolicy> {
    let limit = parse_optional("[timeout].limit", section.limit.as_deref())?;
    let kill_after = parse_optional("[timeout].kill_after", section.kill_after.as_deref())?;

    let policy = TimeoutPolicy { limit, kill_after };
    if policy.kill_after.is_some() && policy.effective_limit().is_none() {
        return Err(RunguardError::ConfigError(
            "[timeout].kill_after requires a nonzero [timeout].limit".to_string(),
        ));
    }
    Ok(policy)
}

fn validate_log(section: LogSection) -> Result<LogSettings> {
    let directory = match section.directory {
        Some(dir) if dir.trim().is_empty() => {
            return Err(RunguardError::ConfigError(
                "[log].directory must not be empty when set".to_string(),
            ));
        }
        Some(dir) => Some(PathBuf::from(dir)),
        None => None,
    };

    Ok(LogSettings {
        directory,
        file_name: section.file_name,
        action: section.action,
        server: section.server,
        username: section.username,
    })
}

fn parse_optional(field: &str, value: Option<&str>) -> Result<Option<Duration>> {
    value
        .map(|s| parse_duration(s).map_err(|e| RunguardError::ConfigError(format!("{field}: {e}"))))
        .transpose()
}
