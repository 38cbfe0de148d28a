// Integration tests for the per-thread script runner

use std::sync::Arc;

use anyhow::Result;
use grindstone::*;

use test_helpers::{
    BrokenClock, CaptureLogger, ClosedLogger, FIXED_MILLIS, FixedClock, RejectingLogger, run_line,
};

fn build_runner(
    thread_id: usize,
    state: &Arc<ProcessState>,
    logger: Arc<dyn Logger>,
) -> Result<LifecycleRunner> {
    Ok(LifecycleRunner::new(
        WorkerThreadId::new(thread_id),
        Arc::clone(state),
        logger,
        &FixedClock,
    )?)
}

#[test]
fn test_even_thread_scenario() -> Result<()> {
    let state = Arc::new(ProcessState::new());
    let logger = Arc::new(CaptureLogger::default());
    let mut runner = build_runner(0, &state, logger.clone())?;

    let mut runs_seen = Vec::new();
    let mut totals_seen = Vec::new();
    for _ in 0..3 {
        runner.run()?;
        runs_seen.push(runner.runs_for_thread());
        totals_seen.push(state.total_runs());
    }

    assert_eq!(runs_seen, [1, 2, 3]);
    assert_eq!(totals_seen, [1, 2, 3]);
    assert_eq!(
        logger.lines(),
        [
            format!("New thread started at time {}", FIXED_MILLIS),
            run_line(1, 1),
            EVEN_THREAD_LINE.to_string(),
            run_line(2, 2),
            EVEN_THREAD_LINE.to_string(),
            run_line(3, 3),
            EVEN_THREAD_LINE.to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_odd_thread_scenario() -> Result<()> {
    let state = Arc::new(ProcessState::new());
    let logger = Arc::new(CaptureLogger::default());
    let mut runner = build_runner(1, &state, logger.clone())?;

    runner.run()?;
    assert_eq!(runner.runs_for_thread(), 1);
    runner.run()?;
    assert_eq!(runner.runs_for_thread(), 2);

    let lines = logger.lines();
    assert_eq!(lines.len(), 3);
    assert!(!lines.iter().any(|l| l == EVEN_THREAD_LINE));
    assert_eq!(lines[2], run_line(2, 2));
    Ok(())
}

#[test]
fn test_identity_is_fixed_across_runs() -> Result<()> {
    let state = Arc::new(ProcessState::new());
    let mut runner = build_runner(6, &state, Arc::new(CaptureLogger::default()))?;

    let timestamp = runner.initialization_timestamp();
    let thread_id = runner.thread_id();

    for _ in 0..25 {
        runner.run()?;
        assert_eq!(runner.initialization_timestamp(), timestamp);
        assert_eq!(runner.thread_id(), thread_id);
    }
    assert_eq!(runner.runs(), 25);
    Ok(())
}

#[test]
fn test_runners_share_total_but_not_private_counts() -> Result<()> {
    let state = Arc::new(ProcessState::new());
    let logger = Arc::new(CaptureLogger::default());
    let mut first = build_runner(0, &state, logger.clone())?;
    let mut second = build_runner(1, &state, logger.clone())?;

    first.run()?;
    second.run()?;
    second.run()?;

    assert_eq!(first.runs_for_thread(), 1);
    assert_eq!(second.runs_for_thread(), 2);
    assert_eq!(state.total_runs(), 3);
    assert_eq!(logger.lines().last().unwrap(), &run_line(2, 3));
    Ok(())
}

#[test]
fn test_logging_failure_keeps_counter_update() -> Result<()> {
    let state = Arc::new(ProcessState::new());
    let logger = Arc::new(RejectingLogger::new("runsForThread"));
    let mut runner = build_runner(1, &state, logger.clone())?;

    let result = runner.run();
    assert!(matches!(result, Err(RunError::Logging(LoggingError::Rejected(_)))));
    assert_eq!(state.total_runs(), 1);
    assert_eq!(runner.runs_for_thread(), 1);

    // The failure is local to that invocation.
    let result = runner.run();
    assert!(result.is_err());
    assert_eq!(state.total_runs(), 2);
    assert_eq!(logger.rejected(), 2);
    Ok(())
}

#[test]
fn test_parity_line_failure_is_reported() -> Result<()> {
    let state = Arc::new(ProcessState::new());
    let logger = Arc::new(RejectingLogger::new("I have an even"));
    let mut runner = build_runner(2, &state, logger)?;

    let error = runner.run().unwrap_err();
    assert!(!error.is_fatal());
    assert_eq!(state.total_runs(), 1);
    Ok(())
}

#[test]
fn test_construction_fails_without_clock() {
    let state = Arc::new(ProcessState::new());
    let result = LifecycleRunner::new(
        WorkerThreadId::new(0),
        state,
        Arc::new(CaptureLogger::default()),
        &BrokenClock,
    );

    assert!(matches!(result, Err(InitializationError::ClockUnavailable(_))));
}

#[test]
fn test_construction_fails_when_sink_is_closed() {
    let state = Arc::new(ProcessState::new());
    let result = LifecycleRunner::new(WorkerThreadId::new(0), state, Arc::new(ClosedLogger), &FixedClock);

    assert!(matches!(result, Err(InitializationError::LogSinkUnavailable(_))));
}

#[test]
fn test_process_initializer_shares_one_state() -> Result<()> {
    let logger = Arc::new(CaptureLogger::default());
    let process = ScriptLifecycle::new(logger.clone(), Arc::new(FixedClock)).initialise()?;

    let mut zero = process.create(WorkerThreadId::new(0))?;
    let mut one = process.create(WorkerThreadId::new(1))?;
    zero.run()?;
    one.run()?;

    assert_eq!(process.total_runs(), 2);
    assert_eq!(process.state().total_runs(), 2);
    Ok(())
}

#[test]
fn test_process_initializer_fails_fast_without_clock() {
    let result = ScriptLifecycle::new(Arc::new(CaptureLogger::default()), Arc::new(BrokenClock)).initialise();
    assert!(matches!(result, Err(InitializationError::ClockUnavailable(_))));
}

#[test]
fn test_process_initializer_emits_no_output() -> Result<()> {
    let logger = Arc::new(CaptureLogger::default());
    let _process = ScriptLifecycle::new(logger.clone(), Arc::new(FixedClock)).initialise()?;
    assert!(logger.lines().is_empty());
    Ok(())
}
