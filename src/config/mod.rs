// src/config/mod.rs

//! Job file loading and validation for runguard.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Parse duration strings like `"3s"` (`duration.rs`).
//! - Load a job file from disk (`loader.rs`).
//! - Validate it into typed policies (`validate.rs`).
//! - Merge command-line overrides on top (`overrides.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod overrides;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_and_validate, load_from_path};
pub use model::{
    CommandSection, JobFile, LogSection, LogSettings, RawJobFile, RetrySection, TimeoutSection,
};
pub use overrides::{resolve_job, Job};
