mod common;
use crate::common::builders::{sh, RetryPolicyBuilder};
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::time::{Duration, Instant};

use runguard::exec::run;
use runguard::types::{CommandSpec, RetryPolicy, TimeoutPolicy, TIMEOUT_EXIT_CODE};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn overrunning_command_is_terminated_and_reported() -> TestResult {
    init_tracing();

    let spec = CommandSpec::new(["sleep", "5"])?;
    let timeout = TimeoutPolicy::after(Duration::from_secs(1));

    let started = Instant::now();
    let result = with_timeout(run(&spec, &timeout, &RetryPolicy::default())).await?;
    let elapsed = started.elapsed();

    assert_eq!(result.exit_code, TIMEOUT_EXIT_CODE);
    assert!(result.timed_out());
    assert!(result.stdout.contains('1'), "stdout: {}", result.stdout);
    assert!(result.stdout.contains("timed out"));
    assert_eq!(result.stderr, "");
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");
    Ok(())
}

#[tokio::test]
async fn timeout_is_retried_without_being_configured() -> TestResult {
    init_tracing();

    let spec = CommandSpec::new(["sleep", "5"])?;
    let timeout = TimeoutPolicy::after(Duration::from_millis(200));
    // Empty trigger set: only the implicit timeout sentinel applies.
    let retry = RetryPolicyBuilder::new().max_retries(2).build();

    let result = with_timeout(run(&spec, &timeout, &retry)).await?;

    assert!(result.timed_out());
    assert_eq!(result.attempt, 3);
    Ok(())
}

#[tokio::test]
async fn fast_command_is_not_touched_by_watchdog() -> TestResult {
    init_tracing();

    let timeout = TimeoutPolicy::after(Duration::from_secs(5));
    let started = Instant::now();
    let result = with_timeout(run(&sh("echo quick; exit 0"), &timeout, &RetryPolicy::default())).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout, "quick\n");
    assert!(!result.timed_out());
    assert!(started.elapsed() < Duration::from_secs(2));
    Ok(())
}

#[tokio::test]
async fn stderr_captured_before_timeout_is_kept() -> TestResult {
    init_tracing();

    let spec = sh("echo partial >&2; exec sleep 5");
    let timeout = TimeoutPolicy::after(Duration::from_millis(500));

    let result = with_timeout(run(&spec, &timeout, &RetryPolicy::default())).await?;

    assert!(result.timed_out());
    assert_eq!(result.stderr, "partial\n");
    assert!(!result.stdout.contains("partial"));
    Ok(())
}

#[tokio::test]
async fn output_held_open_by_background_child_still_times_out() -> TestResult {
    init_tracing();

    // The shell exits at once; the backgrounded sleep keeps stdout open.
    let spec = sh("sleep 3 & echo hi");
    let timeout = TimeoutPolicy::after(Duration::from_millis(500));

    let started = Instant::now();
    let result = with_timeout(run(&spec, &timeout, &RetryPolicy::default())).await?;
    let elapsed = started.elapsed();

    assert!(result.timed_out(), "result: {result:?}");
    assert_eq!(result.exit_code, TIMEOUT_EXIT_CODE);
    assert!(result.stdout.contains("timed out"));
    assert!(elapsed < Duration::from_millis(2500), "took {elapsed:?}");
    Ok(())
}

#[tokio::test]
async fn kill_after_forces_a_term_ignoring_process_down() -> TestResult {
    init_tracing();

    let spec = sh("trap '' TERM; sleep 5");
    let timeout = TimeoutPolicy::after(Duration::from_millis(300))
        .with_kill_after(Duration::from_millis(300));

    let started = Instant::now();
    let result = with_timeout(run(&spec, &timeout, &RetryPolicy::default())).await?;

    assert!(result.timed_out());
    assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
    Ok(())
}

#[tokio::test]
async fn zero_timeout_means_unbounded() -> TestResult {
    init_tracing();

    let timeout = TimeoutPolicy::after(Duration::ZERO);
    let result = with_timeout(run(&sh("sleep 0.2; exit 5"), &timeout, &RetryPolicy::default())).await?;

    assert_eq!(result.exit_code, 5);
    Ok(())
}
