// Runs the script lifecycle on a small worker pool and prints the outcome.
//
// Usage: cargo run --example script_lifecycle -- [threads] [runs] [log-file]

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use grindstone::logging;
use grindstone::*;

fn main() -> Result<()> {
    logging::init_default();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(arg) => {
            let threads: usize = arg.parse().context("threads must be a number")?;
            WorkerPoolConfig::default().with_threads(threads)
        }
        None => WorkerPoolConfig::per_cpu(),
    };
    let runs: u64 = match args.next() {
        Some(arg) => arg.parse().context("runs must be a number")?,
        None => 3,
    };

    let initializer = match args.next() {
        Some(path) => {
            let logger = FileLogger::open(&path).with_context(|| format!("opening {}", path))?;
            ScriptLifecycle::new(Arc::new(logger), Arc::new(SystemClock))
        }
        None => ScriptLifecycle::default(),
    };

    let pool = WorkerPool::new(config.with_runs(runs));

    let exit = match pool.run_process(initializer) {
        Ok((process, report)) => {
            println!("Total runs: {}", process.total_runs());
            for outcome in &report.threads {
                println!(
                    "  thread {}: {:?}, {} runs, {} logging failures",
                    outcome.thread_id, outcome.status, outcome.runs_completed, outcome.logging_failures
                );
            }
            println!("Elapsed: {:?}", report.elapsed);
            ProcessExit::from_report(&report)
        }
        Err(error) => {
            eprintln!("Worker process failed: {}", error);
            ProcessExit::from_error(&error)
        }
    };

    println!("Exit code: {}", exit.code());
    std::process::exit(exit.code());
}
