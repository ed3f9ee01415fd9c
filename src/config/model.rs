// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{CommandSpec, RetryPolicy, TimeoutPolicy};

/// Job file as read from TOML, before validation.
///
/// ```toml
/// [command]
/// argv = ["scp", "-i", "/root/automation_user.priv", "a.txt", "johndoe@linuxhost01:/tmp"]
/// env = { PATH = "/usr/bin:/bin" }
///
/// [retry]
/// on_exit_codes = [1, 255]
/// max_retries = 2
/// delay = "3s"
///
/// [timeout]
/// limit = "10s"
/// kill_after = "5s"
///
/// [log]
/// directory = "/tmp"
/// file_name = "execution_logs.txt"
/// action = "SCP Files to remote server"
/// server = "linuxhost01.acme.com"
/// username = "johndoe"
/// ```
///
/// Every section is optional; the command may instead come from the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawJobFile {
    #[serde(default)]
    pub command: Option<CommandSection>,

    #[serde(default)]
    pub retry: RetrySection,

    #[serde(default)]
    pub timeout: TimeoutSection,

    #[serde(default)]
    pub log: LogSection,
}

/// `[command]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSection {
    /// Program followed by its arguments. No shell is involved.
    pub argv: Vec<String>,

    /// If present, this is the child's *entire* environment.
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
}

/// `[retry]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Exit statuses that cause another attempt. Timeouts always do.
    #[serde(default)]
    pub on_exit_codes: Vec<i32>,

    #[serde(default)]
    pub max_retries: u32,

    /// Pause after each attempt, e.g. `"3s"`.
    #[serde(default)]
    pub delay: Option<String>,
}

/// `[timeout]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutSection {
    /// Per-attempt limit; absent or `"0s"` means unbounded.
    #[serde(default)]
    pub limit: Option<String>,

    /// SIGKILL the child if it survives this long after SIGTERM.
    #[serde(default)]
    pub kill_after: Option<String>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Directory holding the execution log. No log is written when absent.
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default)]
    pub file_name: Option<String>,

    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub server: Option<String>,

    #[serde(default)]
    pub username: Option<String>,
}

/// Validated job file. Construct via `JobFile::try_from(RawJobFile)`.
#[derive(Debug, Clone, Default)]
pub struct JobFile {
    pub command: Option<CommandSpec>,
    pub retry: RetryPolicy,
    pub timeout: TimeoutPolicy,
    pub log: LogSettings,
}

/// Where and how to record the execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub directory: Option<PathBuf>,
    pub file_name: Option<String>,
    pub action: Option<String>,
    pub server: Option<String>,
    pub username: Option<String>,
}
