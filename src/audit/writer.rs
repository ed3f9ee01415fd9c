// src/audit/writer.rs

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::audit::entry::LogEntry;
use crate::errors::{Result, RunguardError};

/// File name used when the caller does not supply one.
pub const DEFAULT_LOG_FILE_NAME: &str = "execution_logs.txt";

/// Join `log_directory` with `log_file_name`.
///
/// Leading separators on the file name are stripped so it can never escape
/// the directory via an absolute path. A missing or blank name falls back to
/// [`DEFAULT_LOG_FILE_NAME`].
pub fn resolve_log_path(log_directory: &Path, log_file_name: Option<&str>) -> Result<PathBuf> {
    if log_directory.as_os_str().is_empty() {
        return Err(RunguardError::ConfigError(
            "no log directory specified".to_string(),
        ));
    }

    let file_name = log_file_name
        .map(|name| name.trim_start_matches(['/', std::path::MAIN_SEPARATOR]))
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_LOG_FILE_NAME);

    Ok(log_directory.join(file_name))
}

/// Append one rendered entry to the log file, creating the file if needed.
///
/// The whole block is written with a single `write_all` and synced before
/// returning. The directory itself is not created.
pub fn append(
    entry: &LogEntry,
    log_directory: impl AsRef<Path>,
    log_file_name: Option<&str>,
) -> Result<()> {
    let path = resolve_log_path(log_directory.as_ref(), log_file_name)?;
    let block = entry.render();

    let write = || -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(block.as_bytes())?;
        file.flush()?;
        file.sync_data()
    };

    write().map_err(|source| RunguardError::LogWrite {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), bytes = block.len(), "appended execution log entry");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_is_config_error() {
        let err = resolve_log_path(Path::new(""), None).unwrap_err();
        assert!(matches!(err, RunguardError::ConfigError(_)));
    }

    #[test]
    fn default_name_when_missing_or_blank() {
        let dir = Path::new("/var/log/");
        assert_eq!(
            resolve_log_path(dir, None).unwrap(),
            PathBuf::from("/var/log/execution_logs.txt")
        );
        assert_eq!(
            resolve_log_path(dir, Some("/")).unwrap(),
            PathBuf::from("/var/log/execution_logs.txt")
        );
    }

    #[test]
    fn leading_separator_stays_inside_directory() {
        assert_eq!(
            resolve_log_path(Path::new("/tmp"), Some("//audit.txt")).unwrap(),
            PathBuf::from("/tmp/audit.txt")
        );
    }
}
