// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::Result;

/// Load a job file from a given path and return the raw `RawJobFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// typed policies.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawJobFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a job file from path and validate it.
///
/// - Reads TOML.
/// - Parses duration strings.
/// - Checks the command token list and the log section.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobFile> {
    let raw = load_from_path(&path)?;
    JobFile::try_from(raw)
}
