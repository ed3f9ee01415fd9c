// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`watchdog`] is the single-shot timer that terminates an overrunning
//!   process.
//! - [`attempt`] spawns one process, captures its output and races it
//!   against the watchdog.
//! - [`backend`] provides the `ProcessBackend` trait and the real
//!   `TokioProcessBackend`; tests swap in a scripted backend.
//! - [`executor`] owns the retry loop.

pub mod attempt;
pub mod backend;
pub mod executor;
pub mod watchdog;

pub use backend::{ProcessBackend, TokioProcessBackend};
pub use executor::{run, Executor};
pub use watchdog::{ReapedFlag, Watchdog, WatchdogOutcome};
