mod common;
use crate::common::builders::{sh, RetryPolicyBuilder};
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::time::{Duration, Instant};

use runguard::errors::RunguardError;
use runguard::exec::{run, Executor};
use runguard::types::{CommandSpec, RetryPolicy, TimeoutPolicy};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn false_runs_once_and_reports_status_one() -> TestResult {
    init_tracing();

    let spec = CommandSpec::new(["false"])?;
    let result = with_timeout(run(&spec, &TimeoutPolicy::default(), &RetryPolicy::default())).await?;

    assert_eq!(result.exit_code, 1);
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "");
    assert_eq!(result.attempt, 1);
    assert!(!result.timed_out());
    Ok(())
}

#[tokio::test]
async fn success_is_not_retried_even_with_budget() -> TestResult {
    init_tracing();

    let retry = RetryPolicyBuilder::new().retry_on(1).max_retries(3).build();
    let result = with_timeout(run(&sh("echo ok"), &TimeoutPolicy::default(), &retry)).await?;

    assert!(result.success());
    assert_eq!(result.stdout, "ok\n");
    assert_eq!(result.attempt, 1);
    Ok(())
}

#[tokio::test]
async fn triggering_status_is_attempted_retries_plus_one_times() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let counter = dir.path().join("count");
    let script = format!("echo x >> '{}'; exit 3", counter.display());

    let retry = RetryPolicyBuilder::new().retry_on(3).max_retries(2).build();
    let result = with_timeout(run(&sh(&script), &TimeoutPolicy::default(), &retry)).await?;

    assert_eq!(result.exit_code, 3);
    assert_eq!(result.attempt, 3);
    assert_eq!(std::fs::read_to_string(&counter)?.lines().count(), 3);
    Ok(())
}

#[tokio::test]
async fn non_triggering_status_stops_the_loop() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let counter = dir.path().join("count");
    // First attempt exits 3 (retried), second exits 4 (not in the set).
    let script = format!(
        "echo x >> '{0}'; if [ $(wc -l < '{0}') -ge 2 ]; then exit 4; fi; exit 3",
        counter.display()
    );

    let retry = RetryPolicyBuilder::new().retry_on(3).max_retries(5).build();
    let result = with_timeout(run(&sh(&script), &TimeoutPolicy::default(), &retry)).await?;

    assert_eq!(result.exit_code, 4);
    assert_eq!(result.attempt, 2);
    Ok(())
}

#[tokio::test]
async fn stdout_and_stderr_are_captured_separately() -> TestResult {
    init_tracing();

    let result = with_timeout(run(
        &sh("echo out; echo err >&2; exit 7"),
        &TimeoutPolicy::default(),
        &RetryPolicy::default(),
    ))
    .await?;

    assert_eq!(result.stdout, "out\n");
    assert_eq!(result.stderr, "err\n");
    assert_eq!(result.exit_code, 7);
    Ok(())
}

#[tokio::test]
async fn env_override_replaces_inherited_environment() -> TestResult {
    init_tracing();

    // HOME is inherited by default; with an override it must be gone.
    let spec = sh("echo \"$GREETING|$HOME\"").with_env([("GREETING", "hello")]);
    let result = with_timeout(run(&spec, &TimeoutPolicy::default(), &RetryPolicy::default())).await?;

    assert_eq!(result.stdout, "hello|\n");
    Ok(())
}

#[tokio::test]
async fn identical_calls_give_identical_results() -> TestResult {
    init_tracing();

    let spec = sh("echo same; echo warn >&2; exit 2");
    let timeout = TimeoutPolicy::after(Duration::from_secs(5));
    let retry = RetryPolicyBuilder::new().retry_on(2).max_retries(1).build();
    let executor = Executor::new();

    let first = with_timeout(executor.run(&spec, &timeout, &retry)).await?;
    let second = with_timeout(executor.run(&spec, &timeout, &retry)).await?;

    assert_eq!(first, second);
    assert_eq!(first.attempt, 2);
    Ok(())
}

#[tokio::test]
async fn delay_is_slept_after_the_final_attempt_too() -> TestResult {
    init_tracing();

    let retry = RetryPolicyBuilder::new()
        .delay(Duration::from_millis(300))
        .build();

    let started = Instant::now();
    let result = with_timeout(run(&sh("true"), &TimeoutPolicy::default(), &retry)).await?;

    assert!(result.success());
    assert!(started.elapsed() >= Duration::from_millis(300));
    Ok(())
}

#[tokio::test]
async fn missing_binary_is_a_spawn_failure() {
    init_tracing();

    let spec = CommandSpec::new(["/definitely/not/a/real/binary"]).unwrap();
    let retry = RetryPolicyBuilder::new().retry_on(127).max_retries(3).build();
    let err = run(&spec, &TimeoutPolicy::default(), &retry)
        .await
        .unwrap_err();

    match err {
        RunguardError::SpawnFailed { program, .. } => {
            assert_eq!(program, "/definitely/not/a/real/binary");
        }
        other => panic!("expected SpawnFailed, got {other:?}"),
    }
}

#[test]
fn empty_command_is_rejected_before_spawning() {
    let err = CommandSpec::new(Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, RunguardError::InvalidCommand(_)));
}
