// src/audit/mod.rs

//! Durable, human-readable audit trail of executions.
//!
//! Each call to [`append`] adds one fixed-format block to a plain-text log
//! file. There is no locking: concurrent writers (threads or processes)
//! appending to the same file may interleave. Callers that need strict
//! ordering inside one process can route entries through
//! [`spawn_log_writer`], which serializes appends on a single task.

pub mod entry;
pub mod queue;
pub mod writer;

pub use entry::LogEntry;
pub use queue::spawn_log_writer;
pub use writer::{append, resolve_log_path, DEFAULT_LOG_FILE_NAME};
