#![allow(dead_code)]

pub use runguard_test_utils::builders;
pub use runguard_test_utils::{init_tracing, with_timeout};
